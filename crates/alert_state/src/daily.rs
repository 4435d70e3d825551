//! Running alert count for the current Eastern day (`daily_alert_count.json`)

use chrono::DateTime;
use chrono_tz::Tz;
use logger::eastern_stamp;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::{read_json, write_json, StateError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyCount {
    pub date:  String,
    pub count: u32,
}

impl DailyCount {
    pub fn fresh(today: &str) -> Self {
        Self { date: today.to_string(), count: 0 }
    }

    /// Bump for one more alert, returning its number for the day. Sticks at `u32::MAX`.
    pub fn next(&mut self) -> u32 {
        self.count = self.count.saturating_add(1);
        self.count
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct DailyFile {
    #[serde(default)]
    date:         String,
    #[serde(default)]
    count:        u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    last_updated: Option<String>,
}

/// Stored count for `today`; a different stored date or a missing file reads as zero.
pub fn load_daily_count(path: &Path, today: &str) -> Result<DailyCount, StateError> {
    let file: DailyFile = match read_json(path) {
        Ok(f) => f,
        Err(e) if e.is_not_found() => return Ok(DailyCount::fresh(today)),
        Err(e) => return Err(e),
    };
    if file.date != today {
        return Ok(DailyCount::fresh(today));
    }
    Ok(DailyCount { date: file.date, count: file.count })
}

pub fn save_daily_count(path: &Path, daily: &DailyCount, now: &DateTime<Tz>) -> Result<(), StateError> {
    let file = DailyFile {
        date:         daily.date.clone(),
        count:        daily.count,
        last_updated: Some(eastern_stamp(now)),
    };
    write_json(path, &file)
}
