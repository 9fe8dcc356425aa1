// Reading and replacing the JSON artifacts shared by training and inference

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::Path;
use crate::error::{CornersError, Result};

/// Read a required JSON artifact. A missing file is reported as
/// [`CornersError::MissingArtifact`] so callers can stop with a clear message.
pub fn read_json_artifact<T: DeserializeOwned>(path: &Path) -> Result<T> {
    if !path.exists() {
        return Err(CornersError::MissingArtifact { path: path.to_path_buf() });
    }
    let raw = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

/// Write `value` as pretty JSON, replacing any previous file in one rename.
pub fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut tmp_name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    tmp_name.push(".tmp");
    let tmp_path = path.with_file_name(tmp_name);

    fs::write(&tmp_path, serde_json::to_vec_pretty(value)?)?;
    fs::rename(&tmp_path, path)?;
    Ok(())
}
