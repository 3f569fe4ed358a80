use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

use crate::error::ExtractError;
use crate::reference::CustomerReference;

const FILE_PREFIX: &str = "customer_references_";
const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Where to write the extracted references.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    /// `customer_references_<YYYYMMDD_HHMMSS>.json` inside `dir`.
    Timestamped { dir: PathBuf },
    /// Exactly this file.
    File(PathBuf),
}

impl OutputTarget {
    pub fn resolve(&self, now: DateTime<Local>) -> PathBuf {
        match self {
            OutputTarget::Timestamped { dir } => dir.join(timestamped_file_name(now)),
            OutputTarget::File(path) => path.clone(),
        }
    }
}

pub fn timestamped_file_name(now: DateTime<Local>) -> String {
    format!("{}{}.json", FILE_PREFIX, now.format(TIMESTAMP_FORMAT))
}

/// Write references as pretty-printed JSON, creating parent directories.
///
/// Nothing is written for an empty slice; `Ok(None)` is returned instead.
pub fn write_references(
    references: &[CustomerReference],
    target: &OutputTarget,
    now: DateTime<Local>,
) -> Result<Option<PathBuf>, ExtractError> {
    if references.is_empty() {
        log::info!("No records extracted; skipping output file");
        return Ok(None);
    }

    let path = target.resolve(now);
    ensure_parent_dir(&path)?;

    let json = serde_json::to_string_pretty(references)?;
    fs::write(&path, json).map_err(|e| ExtractError::io(&path, e))?;

    log::info!("Saved {} records to {}", references.len(), path.display());
    Ok(Some(path))
}

fn ensure_parent_dir(path: &Path) -> Result<(), ExtractError> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            fs::create_dir_all(parent).map_err(|e| ExtractError::io(parent, e))
        }
        _ => Ok(()),
    }
}
