//! Alert configuration (`ou_3_no_score.json`)

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::path::Path;

use crate::{read_json, StateError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertConfig {
    #[serde(deserialize_with = "truthy")]
    pub enabled:   bool,
    pub criteria:  Criteria,
    pub retention: Retention,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Criteria {
    pub min_ou_line: f64,
}

/// Growth limits for the dedup set and the alert log. `None` = unbounded.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Retention {
    pub processed_ttl_days: Option<u32>,
    pub log_max_bytes:      Option<u64>,
}

/// Any JSON value for a flag: `0`, `""`, `null` and empty containers are off.
fn truthy<'de, D: Deserializer<'de>>(de: D) -> Result<bool, D::Error> {
    Ok(match Value::deserialize(de)? {
        Value::Null      => false,
        Value::Bool(b)   => b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a)  => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    })
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            enabled:   true,
            criteria:  Criteria::default(),
            retention: Retention::default(),
        }
    }
}

impl Default for Criteria {
    fn default() -> Self {
        Self { min_ou_line: 3.0 }
    }
}

/// Caller falls back to [`AlertConfig::default`] on any error.
pub fn load_config(path: &Path) -> Result<AlertConfig, StateError> {
    read_json(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn defaults() {
        let c = AlertConfig::default();
        assert!(c.enabled);
        assert_eq!(c.criteria.min_ou_line, 3.0);
        assert_eq!(c.retention, Retention::default());
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cfg.json");

        fs::write(&path, r#"{"enabled": false}"#).unwrap();
        let c = load_config(&path).unwrap();
        assert!(!c.enabled);
        assert_eq!(c.criteria.min_ou_line, 3.0);

        fs::write(&path, r#"{"criteria": {"min_ou_line": 3.5, "required_status": "half_time"}}"#).unwrap();
        let c = load_config(&path).unwrap();
        assert!(c.enabled);
        assert_eq!(c.criteria.min_ou_line, 3.5);
    }

    #[test]
    fn enabled_accepts_any_json_value() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cfg.json");

        fs::write(&path, r#"{"enabled": 0, "criteria": {"min_ou_line": 2.5}}"#).unwrap();
        let c = load_config(&path).unwrap();
        assert!(!c.enabled);
        assert_eq!(c.criteria.min_ou_line, 2.5);

        for (raw, expected) in [("null", false), ("\"\"", false), ("[]", false), ("1", true), ("\"yes\"", true)] {
            fs::write(&path, format!(r#"{{"enabled": {raw}}}"#)).unwrap();
            assert_eq!(load_config(&path).unwrap().enabled, expected, "enabled = {raw}");
        }
    }

    #[test]
    fn retention_block() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cfg.json");
        fs::write(&path, r#"{"retention": {"processed_ttl_days": 7, "log_max_bytes": 1048576}}"#).unwrap();
        let c = load_config(&path).unwrap();
        assert_eq!(c.retention.processed_ttl_days, Some(7));
        assert_eq!(c.retention.log_max_bytes, Some(1_048_576));
    }

    #[test]
    fn missing_and_malformed_are_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cfg.json");
        assert!(load_config(&path).unwrap_err().is_not_found());

        fs::write(&path, r#"{"criteria": {"min_ou_line": "high"}}"#).unwrap();
        assert!(matches!(load_config(&path), Err(StateError::Parse { .. })));
    }
}
