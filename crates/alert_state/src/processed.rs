//! Already-alerted match keys + last processed fetch time (`processed_matches.json`)

use chrono::{DateTime, TimeDelta, Utc};
use chrono_tz::Tz;
use logger::eastern_stamp;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use crate::{read_json, write_json, StateError};

#[derive(Debug, Default, Serialize, Deserialize)]
struct ProcessedFile {
    #[serde(default)]
    processed_matches: Vec<String>,
    #[serde(default)]
    last_fetch_time:   String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    last_updated:      Option<String>,
    #[serde(default)]
    first_seen:        BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProcessedState {
    /// key → first time it was alerted
    keys:                HashMap<String, DateTime<Utc>>,
    pub last_fetch_time: String,
}

impl ProcessedState {
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.keys.contains_key(key)
    }

    /// Returns false if the key was already there (its first-seen time is kept).
    pub fn insert(&mut self, key: impl Into<String>, at: DateTime<Utc>) -> bool {
        let key = key.into();
        if self.keys.contains_key(&key) {
            return false;
        }
        self.keys.insert(key, at);
        true
    }

    pub fn sorted_keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.keys.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    /// Drop keys first seen before `cutoff`. Returns how many were evicted.
    pub fn prune_older_than(&mut self, cutoff: DateTime<Utc>) -> usize {
        let before = self.keys.len();
        self.keys.retain(|_, seen| *seen >= cutoff);
        before - self.keys.len()
    }

    /// TTL form of [`prune_older_than`](Self::prune_older_than).
    /// `None` when the cutoff falls outside the representable range; nothing is evicted.
    pub fn prune_expired(&mut self, now: DateTime<Utc>, ttl_days: u32) -> Option<usize> {
        let cutoff = TimeDelta::try_days(i64::from(ttl_days)).and_then(|ttl| now.checked_sub_signed(ttl))?;
        Some(self.prune_older_than(cutoff))
    }
}

/// Missing file → empty state. Keys without a recorded first-seen time get `now`.
pub fn load_processed(path: &Path, now: DateTime<Utc>) -> Result<ProcessedState, StateError> {
    let file: ProcessedFile = match read_json(path) {
        Ok(f) => f,
        Err(e) if e.is_not_found() => return Ok(ProcessedState::default()),
        Err(e) => return Err(e),
    };

    let keys = file
        .processed_matches
        .into_iter()
        .map(|key| {
            let seen = file
                .first_seen
                .get(&key)
                .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
                .map(|d| d.with_timezone(&Utc))
                .unwrap_or(now);
            (key, seen)
        })
        .collect();

    Ok(ProcessedState {
        keys,
        last_fetch_time: file.last_fetch_time,
    })
}

pub fn save_processed(path: &Path, state: &ProcessedState, now: &DateTime<Tz>) -> Result<(), StateError> {
    let tz = now.timezone();
    let file = ProcessedFile {
        processed_matches: state.sorted_keys().into_iter().map(str::to_string).collect(),
        last_fetch_time:   state.last_fetch_time.clone(),
        last_updated:      Some(eastern_stamp(now)),
        first_seen:        state
            .keys
            .iter()
            .map(|(k, seen)| (k.clone(), seen.with_timezone(&tz).to_rfc3339()))
            .collect(),
    };
    write_json(path, &file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use chrono_tz::America::New_York;
    use std::fs;

    fn at(day: u32) -> DateTime<Tz> {
        New_York.with_ymd_and_hms(2026, 10, day, 12, 0, 0).unwrap()
    }

    #[test]
    fn missing_file_is_empty_state() {
        let dir = tempfile::tempdir().unwrap();
        let s = load_processed(&dir.path().join("p.json"), Utc::now()).unwrap();
        assert!(s.is_empty());
        assert_eq!(s.last_fetch_time, "");
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("p.json");
        fs::write(&path, "[").unwrap();
        assert!(matches!(load_processed(&path, Utc::now()), Err(StateError::Parse { .. })));
    }

    #[test]
    fn save_then_load_keeps_keys_and_fetch_time() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("p.json");
        let now = at(19);

        let mut s = ProcessedState::default();
        assert!(s.insert("b_3.5_halftime", now.with_timezone(&Utc)));
        assert!(s.insert("a_4.0_halftime", now.with_timezone(&Utc)));
        assert!(!s.insert("a_4.0_halftime", now.with_timezone(&Utc)));
        s.last_fetch_time = "2026-10-19 12:00:00".to_string();
        save_processed(&path, &s, &now).unwrap();

        let raw: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["processed_matches"], serde_json::json!(["a_4.0_halftime", "b_3.5_halftime"]));
        assert_eq!(raw["last_fetch_time"], "2026-10-19 12:00:00");
        assert_eq!(raw["last_updated"], "10/19/2026 12:00:00 PM EDT");

        let loaded = load_processed(&path, Utc::now()).unwrap();
        assert_eq!(loaded, s);
    }

    #[test]
    fn legacy_file_without_first_seen_is_stamped_now() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("p.json");
        fs::write(
            &path,
            r#"{"processed_matches": ["x_3.5_halftime"], "last_fetch_time": "t0", "last_updated": "whenever"}"#,
        )
        .unwrap();

        let now = at(19).with_timezone(&Utc);
        let mut s = load_processed(&path, now).unwrap();
        assert!(s.contains("x_3.5_halftime"));
        assert_eq!(s.last_fetch_time, "t0");
        assert_eq!(s.prune_expired(now, 1), Some(0));
    }

    #[test]
    fn prune_evicts_only_expired_keys() {
        let mut s = ProcessedState::default();
        s.insert("old", at(1).with_timezone(&Utc));
        s.insert("recent", at(17).with_timezone(&Utc));

        let evicted = s.prune_expired(at(19).with_timezone(&Utc), 7);
        assert_eq!(evicted, Some(1));
        assert!(!s.contains("old"));
        assert!(s.contains("recent"));
    }

    #[test]
    fn huge_ttl_keeps_everything() {
        let mut s = ProcessedState::default();
        s.insert("old", at(1).with_timezone(&Utc));
        assert_eq!(s.prune_expired(at(19).with_timezone(&Utc), u32::MAX), None);
        assert!(s.contains("old"));
    }
}
