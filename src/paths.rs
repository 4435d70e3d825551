use std::env;
use std::path::{Path, PathBuf};

pub const DEFAULT_SNAPSHOT_PATH: &str = "step5/step5.json";

pub const LOG_FILE: &str = "ou_3_no_score.log";
pub const CONFIG_FILE: &str = "ou_3_no_score.json";
pub const PROCESSED_FILE: &str = "processed_matches.json";
pub const DAILY_COUNTER_FILE: &str = "daily_alert_count.json";

/// Where one alert cycle reads and writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertPaths {
    pub snapshot:      PathBuf,
    pub config:        PathBuf,
    pub processed:     PathBuf,
    pub daily_counter: PathBuf,
    pub log:           PathBuf,
}

impl AlertPaths {
    /// Config, state and log live together in `dir`.
    pub fn in_dir(dir: impl AsRef<Path>, snapshot: impl Into<PathBuf>) -> Self {
        let dir = dir.as_ref();
        Self {
            snapshot:      snapshot.into(),
            config:        dir.join(CONFIG_FILE),
            processed:     dir.join(PROCESSED_FILE),
            daily_counter: dir.join(DAILY_COUNTER_FILE),
            log:           dir.join(LOG_FILE),
        }
    }

    /// `OU_ALERT_DIR` (default `.`) and `OU_ALERT_SNAPSHOT` (default `step5/step5.json`).
    pub fn from_env() -> Self {
        let dir = env::var("OU_ALERT_DIR").unwrap_or_else(|_| ".".to_string());
        let snapshot = env::var("OU_ALERT_SNAPSHOT").unwrap_or_else(|_| DEFAULT_SNAPSHOT_PATH.to_string());
        Self::in_dir(dir, snapshot)
    }
}
