//! OU Halftime Alert - State
//!
//! Config, dedup set and daily counter, each a small JSON file rewritten whole.
//! Every load/save returns a `Result`; the alert cycle decides to warn and move on.

pub mod config;
pub mod daily;
pub mod error;
pub mod processed;

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::Path;

pub use config::{load_config, AlertConfig, Criteria, Retention};
pub use daily::{load_daily_count, save_daily_count, DailyCount};
pub use error::StateError;
pub use processed::{load_processed, save_processed, ProcessedState};

pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, StateError> {
    let raw = fs::read_to_string(path).map_err(|source| StateError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| StateError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

pub(crate) fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), StateError> {
    let body = serde_json::to_string_pretty(value)?;
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).ok();
        }
    }
    fs::write(path, body).map_err(|source| StateError::Write {
        path: path.to_path_buf(),
        source,
    })
}
