// Tabular input and output

use anyhow::{Context, Result};
use corners_models::{CornersError, HistoricalResult};
use serde::Serialize;
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

/// Write `rows` as a CSV file with a header row, creating parent directories.
pub fn write_csv<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).with_context(|| format!("creating {}", parent.display()))?;
        }
    }

    let mut writer = csv::Writer::from_path(path).with_context(|| format!("opening {}", path.display()))?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    info!("💾 Wrote {} rows to {}", rows.len(), path.display());
    Ok(())
}

/// Historical results with at least `home_team`, `away_team` and
/// `total_corners` columns. Rows that fail to parse are dropped.
pub fn read_historical_results(path: &Path) -> Result<Vec<HistoricalResult>> {
    if !path.exists() {
        return Err(CornersError::MissingArtifact { path: path.to_path_buf() }.into());
    }

    let mut reader = csv::Reader::from_path(path).with_context(|| format!("opening {}", path.display()))?;
    let mut results = Vec::new();
    let mut dropped = 0usize;

    for (line, row) in reader.deserialize::<HistoricalResult>().enumerate() {
        match row {
            Ok(result) if result.total_corners.is_finite() => results.push(result),
            Ok(_) => dropped += 1,
            Err(e) => {
                debug!("Dropping results row {}: {}", line + 2, e);
                dropped += 1;
            }
        }
    }

    if dropped > 0 {
        warn!("⚠️  Dropped {} malformed rows from {}", dropped, path.display());
    }
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use corners_models::PredictionRow;

    #[test]
    fn test_write_csv_creates_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("predictions.csv");
        let rows = vec![PredictionRow { match_label: "Arsenal vs Chelsea".to_string(), expected_corners: 10.25 }];

        write_csv(&path, &rows).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert_eq!(written, "match,expected_corners\nArsenal vs Chelsea,10.25\n");
    }

    #[test]
    fn test_read_results_drops_bad_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.csv");
        fs::write(
            &path,
            "match_id,date,home_team,away_team,home_corner_kicks,away_corner_kicks,total_corners\n\
             1,2025-03-01,Arsenal,Chelsea,6,4,10\n\
             2,2025-03-01,Everton,Fulham,,,\n\
             3,2025-03-02,Leeds,Burnley,x,2,abc\n\
             4,2025-03-02,Brentford,Wolves,5,5,10\n",
        )
        .unwrap();

        let results = read_historical_results(&path).unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].total_corners, 10.0);
        assert_eq!(results[1].home_team, "Brentford");
    }

    #[test]
    fn test_missing_results_file_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_historical_results(&dir.path().join("nope.csv")).unwrap_err();

        assert!(matches!(
            err.downcast_ref::<CornersError>(),
            Some(CornersError::MissingArtifact { .. })
        ));
    }
}
