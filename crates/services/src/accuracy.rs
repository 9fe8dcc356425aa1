// Replay of historical results through the prediction pipeline

use corners_ml::PredictionModel;
use corners_models::{round_to, EvaluationRecord, HistoricalResult, TeamAccuracy};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info};
use crate::predictor::PredictorService;

/// Thresholds for the accuracy report.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReporterConfig {
    /// Teams with fewer replayed appearances are left out of the team table
    pub min_team_games: u32,
    /// Absolute error (in corners) from which a record counts as an extreme miss
    pub extreme_miss_threshold: i64,
}

impl Default for ReporterConfig {
    fn default() -> Self {
        Self { min_team_games: 3, extreme_miss_threshold: 5 }
    }
}

/// Replay outcome: per-record classification plus aggregates.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AccuracyReport {
    pub records: Vec<EvaluationRecord>,
    pub total: usize,
    pub hits: usize,
    /// Hit percentage, 0–100
    pub accuracy: f64,
    pub mean_abs_error: f64,
    pub extreme_misses: usize,
    /// Absolute error → number of records
    pub error_distribution: BTreeMap<i64, usize>,
    /// Best accuracy first, ties by team name
    pub teams: Vec<TeamAccuracy>,
}

impl AccuracyReport {
    /// Team with the highest accuracy; the table is sorted best first.
    pub fn best_team(&self) -> Option<&TeamAccuracy> {
        self.teams.first()
    }

    pub fn worst_team(&self) -> Option<&TeamAccuracy> {
        self.teams.last()
    }

    /// Log the headline numbers and the best and worst team.
    pub fn log_summary(&self) {
        info!("✅ Accuracy: {:.2}% ({}/{})", self.accuracy, self.hits, self.total);
        info!("📉 Mean absolute error: {:.2}", self.mean_abs_error);
        info!("❌ Extreme misses: {}", self.extreme_misses);
        for (error, count) in &self.error_distribution {
            debug!("   |error| = {}: {}", error, count);
        }
        if let Some(best) = self.best_team() {
            info!("🏆 Best team: {} ({:.2}%, {} games)", best.team, best.accuracy, best.games);
        }
        if let Some(worst) = self.worst_team() {
            info!("🫣 Worst team: {} ({:.2}%, {} games)", worst.team, worst.accuracy, worst.games);
        }
    }
}

/// Replays historical results through the predictor and scores them.
#[derive(Debug, Clone, Default)]
pub struct AccuracyReporter {
    config: ReporterConfig,
}

impl AccuracyReporter {
    pub fn new(config: ReporterConfig) -> Self {
        Self { config }
    }

    /// Classify one prediction against the actual total. The expectation is
    /// taken to two decimals, then both sides are rounded half to even;
    /// a hit means the rounded prediction did not exceed the rounded actual.
    pub fn record(&self, home_team: &str, away_team: &str, expected_total: f64, total_corners: f64) -> EvaluationRecord {
        let expected_corners = round_to(expected_total, 2);
        let expected_rounded = expected_corners.round_ties_even() as i64;
        let total_rounded = total_corners.round_ties_even() as i64;
        let abs_error = (expected_rounded - total_rounded).abs();

        EvaluationRecord {
            home_team: home_team.to_string(),
            away_team: away_team.to_string(),
            expected_corners,
            total_corners,
            expected_rounded,
            total_rounded,
            hit: expected_rounded <= total_rounded,
            abs_error,
            extreme_miss: abs_error >= self.config.extreme_miss_threshold,
        }
    }

    /// Predict every result whose teams both resolve and aggregate the outcomes.
    pub fn replay<M: PredictionModel>(&self, results: &[HistoricalResult], predictor: &PredictorService<M>) -> AccuracyReport {
        let records: Vec<EvaluationRecord> = results
            .iter()
            .filter_map(|result| {
                let prediction = predictor.predict_pair(&result.home_team, &result.away_team)?;
                Some(self.record(
                    &prediction.home_team,
                    &prediction.away_team,
                    prediction.total_expected,
                    result.total_corners,
                ))
            })
            .collect();

        info!("🔁 Replayed {} of {} historical results", records.len(), results.len());
        self.summarize(records)
    }

    /// Aggregate already classified records into a report.
    pub fn summarize(&self, records: Vec<EvaluationRecord>) -> AccuracyReport {
        let total = records.len();
        let hits = records.iter().filter(|r| r.hit).count();
        let extreme_misses = records.iter().filter(|r| r.extreme_miss).count();

        let (accuracy, mean_abs_error) = if total == 0 {
            (0.0, 0.0)
        } else {
            let error_sum: i64 = records.iter().map(|r| r.abs_error).sum();
            (hits as f64 / total as f64 * 100.0, error_sum as f64 / total as f64)
        };

        let mut error_distribution = BTreeMap::new();
        for record in &records {
            *error_distribution.entry(record.abs_error).or_insert(0) += 1;
        }

        let teams = self.team_accuracy(&records);

        AccuracyReport {
            records,
            total,
            hits,
            accuracy,
            mean_abs_error,
            extreme_misses,
            error_distribution,
            teams,
        }
    }

    /// Per-team hit rate over home and away appearances.
    fn team_accuracy(&self, records: &[EvaluationRecord]) -> Vec<TeamAccuracy> {
        let mut tallies: BTreeMap<&str, (u32, u32)> = BTreeMap::new();
        for record in records {
            for team in [record.home_team.as_str(), record.away_team.as_str()] {
                let (games, hits) = tallies.entry(team).or_insert((0, 0));
                *games += 1;
                if record.hit {
                    *hits += 1;
                }
            }
        }

        let mut teams: Vec<TeamAccuracy> = tallies
            .into_iter()
            .filter(|(_, (games, _))| *games >= self.config.min_team_games)
            .map(|(team, (games, hits))| TeamAccuracy {
                team: team.to_string(),
                accuracy: f64::from(hits) / f64::from(games) * 100.0,
                games,
            })
            .collect();

        // stable sort keeps name order among equal accuracies
        teams.sort_by(|a, b| b.accuracy.total_cmp(&a.accuracy));
        teams
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predictor::tests::predictor;

    fn result(home: &str, away: &str, total_corners: f64) -> HistoricalResult {
        HistoricalResult {
            home_team: home.to_string(),
            away_team: away.to_string(),
            total_corners,
        }
    }

    #[test]
    fn test_over_prediction_is_a_miss() {
        let record = AccuracyReporter::default().record("A", "B", 7.4, 6.0);

        assert_eq!(record.expected_rounded, 7);
        assert_eq!(record.total_rounded, 6);
        assert!(!record.hit);
        assert_eq!(record.abs_error, 1);
        assert!(!record.extreme_miss);
    }

    #[test]
    fn test_under_prediction_is_a_hit() {
        let record = AccuracyReporter::default().record("A", "B", 5.0, 11.0);

        assert!(record.hit);
        assert_eq!(record.abs_error, 6);
        assert!(record.extreme_miss);
    }

    #[test]
    fn test_halves_round_to_even() {
        let record = AccuracyReporter::default().record("A", "B", 8.5, 8.5);
        assert_eq!(record.expected_rounded, 8);
        assert_eq!(record.total_rounded, 8);
        assert!(record.hit);

        let record = AccuracyReporter::default().record("A", "B", 9.5, 10.0);
        assert_eq!(record.expected_rounded, 10);
        assert!(record.hit);
        assert_eq!(record.abs_error, 0);
    }

    #[test]
    fn test_half_below_even_actual_is_a_hit() {
        // 8.5 drops to 8, so it no longer overshoots an actual of 8
        let record = AccuracyReporter::default().record("A", "B", 8.5, 8.0);

        assert_eq!(record.expected_rounded, 8);
        assert!(record.hit);
        assert_eq!(record.abs_error, 0);
    }

    #[test]
    fn test_expected_kept_to_two_decimals() {
        let record = AccuracyReporter::default().record("A", "B", 9.87654, 10.0);
        assert_eq!(record.expected_corners, 9.88);
    }

    #[test]
    fn test_replay_aggregates() {
        // Arsenal 6, Chelsea 4, Everton 2 expected corners each
        let results = vec![
            result("Arsenal", "Chelsea", 12.0),
            result("Arsenal FC", "Chelsea", 9.0),
            result("Everton", "Chelsea", 6.0),
            result("Arsenal", "Everton", 14.0),
            result("Unknown United", "Chelsea", 10.0),
        ];

        let report = AccuracyReporter::default().replay(&results, &predictor());

        assert_eq!(report.total, 4);
        assert_eq!(report.hits, 3);
        assert_eq!(report.accuracy, 75.0);
        assert_eq!(report.mean_abs_error, 2.25);
        assert_eq!(report.extreme_misses, 1);
        assert_eq!(report.error_distribution, BTreeMap::from([(0, 1), (1, 1), (2, 1), (6, 1)]));
        assert_eq!(report.records[1].home_team, "Arsenal");

        // Everton has only two appearances
        let names: Vec<&str> = report.teams.iter().map(|t| t.team.as_str()).collect();
        assert_eq!(names, vec!["Arsenal", "Chelsea"]);
        assert_eq!(report.best_team().unwrap().games, 3);
        assert_eq!(report.worst_team().unwrap().team, "Chelsea");
    }

    #[test]
    fn test_team_table_sorted_by_accuracy() {
        let reporter = AccuracyReporter::new(ReporterConfig { min_team_games: 1, extreme_miss_threshold: 5 });
        let records = vec![
            reporter.record("Zeta", "Alpha", 12.0, 9.0),
            reporter.record("Zeta", "Beta", 8.0, 9.0),
        ];

        let report = reporter.summarize(records);

        let names: Vec<&str> = report.teams.iter().map(|t| t.team.as_str()).collect();
        assert_eq!(names, vec!["Beta", "Zeta", "Alpha"]);
        assert_eq!(report.teams[1].accuracy, 50.0);
    }

    #[test]
    fn test_empty_replay() {
        let report = AccuracyReporter::default().summarize(Vec::new());

        assert_eq!(report.accuracy, 0.0);
        assert!(report.best_team().is_none());
    }
}
