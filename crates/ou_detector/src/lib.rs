//! OU Halftime Alert - OU Detector
//!
//! Three gates, checked in order: half-time break status, scoreless, and an
//! over/under line at or above the threshold. Plus the dedup key for a match.

use match_feed::{number_label, MatchRecord, OuLine, HALF_TIME_STATUS_ID};
use serde_json::Value;

pub const DEFAULT_MIN_OU_LINE: f64 = 3.0;

const KEY_SUFFIX: &str = "halftime";

/// Which gate rejected a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Qualifies,
    NotHalfTime,
    NotScoreless,
    NoQualifyingLine,
}

impl Verdict {
    pub fn qualifies(self) -> bool {
        self == Verdict::Qualifies
    }
}

#[derive(Debug, Clone, Copy)]
pub struct OuDetector {
    min_line: f64,
}

impl Default for OuDetector {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_OU_LINE)
    }
}

impl OuDetector {
    pub fn new(min_line: f64) -> Self {
        Self { min_line }
    }

    pub fn min_line(&self) -> f64 {
        self.min_line
    }

    pub fn evaluate(&self, m: &MatchRecord) -> Verdict {
        if !is_half_time(m) {
            return Verdict::NotHalfTime;
        }
        if !is_scoreless(m) {
            return Verdict::NotScoreless;
        }
        if !self.has_qualifying_line(m) {
            return Verdict::NoQualifyingLine;
        }
        Verdict::Qualifies
    }

    pub fn qualifies(&self, m: &MatchRecord) -> bool {
        self.evaluate(m).qualifies()
    }

    /// A zero line counts as "no line", same as a missing one.
    pub fn is_qualifying(&self, line: &OuLine<'_>) -> bool {
        match line.value() {
            Some(v) => v != 0.0 && v >= self.min_line,
            None => false,
        }
    }

    pub fn has_qualifying_line(&self, m: &MatchRecord) -> bool {
        m.over_under().iter().any(|l| self.is_qualifying(l))
    }

    /// `{match_id}_{sorted qualifying lines joined by |}_halftime`
    ///
    /// Scores and status are not part of the key, so a match alerts once per
    /// distinct set of qualifying lines.
    pub fn match_key(&self, m: &MatchRecord) -> String {
        let match_id = m.match_id().unwrap_or_else(|| "unknown".to_string());

        let mut lines: Vec<String> = m
            .over_under()
            .iter()
            .filter(|l| self.is_qualifying(l))
            .filter_map(|l| match l.line {
                Some(Value::Number(n)) => Some(number_label(n)),
                _ => None,
            })
            .collect();
        lines.sort();

        format!("{}_{}_{}", match_id, lines.join("|"), KEY_SUFFIX)
    }
}

pub fn is_half_time(m: &MatchRecord) -> bool {
    m.has_status(HALF_TIME_STATUS_ID)
}

/// Unreadable scores fail closed.
pub fn is_scoreless(m: &MatchRecord) -> bool {
    matches!((m.home_score(), m.away_score()), (Some(0), Some(0)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn halftime_match(line: Value) -> MatchRecord {
        MatchRecord::new(json!({
            "match_id": "test_001",
            "home_team": "Test Team A",
            "away_team": "Test Team B",
            "home_score": 0,
            "away_score": 0,
            "status_id": 3,
            "over_under": {"line_1": {"line": line, "over": -110, "under": -110}}
        }))
    }

    fn with(m: &MatchRecord, key: &str, v: Value) -> MatchRecord {
        let mut raw = m.raw().clone();
        raw[key] = v;
        MatchRecord::new(raw)
    }

    #[test]
    fn all_three_gates_pass() {
        let d = OuDetector::default();
        assert_eq!(d.evaluate(&halftime_match(json!(3.5))), Verdict::Qualifies);
        assert!(d.qualifies(&halftime_match(json!(3.0))));
        assert!(d.qualifies(&halftime_match(json!(4))));
    }

    #[test]
    fn each_gate_flips_the_verdict() {
        let d = OuDetector::default();
        let base = halftime_match(json!(3.5));

        assert_eq!(d.evaluate(&with(&base, "status_id", json!(2))), Verdict::NotHalfTime);
        assert_eq!(d.evaluate(&with(&base, "status_id", json!("3"))), Verdict::NotHalfTime);
        assert_eq!(d.evaluate(&with(&base, "home_score", json!(1))), Verdict::NotScoreless);
        assert_eq!(d.evaluate(&with(&base, "away_score", json!("2"))), Verdict::NotScoreless);
        assert_eq!(d.evaluate(&halftime_match(json!(2.5))), Verdict::NoQualifyingLine);
    }

    #[test]
    fn score_coercion_edges() {
        let d = OuDetector::default();
        let base = halftime_match(json!(3.5));
        assert!(d.qualifies(&with(&base, "home_score", json!(null))));
        assert!(d.qualifies(&with(&base, "home_score", json!("0"))));
        assert_eq!(d.evaluate(&with(&base, "home_score", json!("zero"))), Verdict::NotScoreless);

        let mut raw = base.raw().clone();
        raw.as_object_mut().unwrap().remove("away_score");
        assert!(d.qualifies(&MatchRecord::new(raw)));
    }

    #[test]
    fn zero_and_null_lines_never_qualify() {
        let d = OuDetector::new(0.0);
        assert!(!d.qualifies(&halftime_match(json!(0))));
        assert!(!d.qualifies(&halftime_match(json!(null))));
        assert!(!d.qualifies(&halftime_match(json!("3.5"))));
        assert!(d.qualifies(&halftime_match(json!(0.5))));
    }

    #[test]
    fn threshold_is_configurable() {
        assert!(!OuDetector::new(4.0).qualifies(&halftime_match(json!(3.5))));
        assert!(OuDetector::new(2.5).qualifies(&halftime_match(json!(2.5))));
    }

    #[test]
    fn key_lists_sorted_qualifying_lines() {
        let m = MatchRecord::new(json!({
            "match_id": "m42",
            "over_under": {
                "a": {"line": 4.5},
                "b": {"line": 2.5},
                "c": {"line": 3.0},
                "d": {"line": 3}
            }
        }));
        assert_eq!(OuDetector::default().match_key(&m), "m42_3|3.0|4.5_halftime");
    }

    #[test]
    fn key_ignores_state_fields() {
        let d = OuDetector::default();
        let base = halftime_match(json!(3.5));
        let key = d.match_key(&base);
        assert_eq!(key, "test_001_3.5_halftime");

        let later = with(&with(&base, "home_score", json!(2)), "status_id", json!(4));
        let renamed = with(&base, "home_team", json!("Renamed FC"));
        assert_eq!(d.match_key(&later), key);
        assert_eq!(d.match_key(&renamed), key);
    }

    #[test]
    fn key_changes_with_line_set() {
        let d = OuDetector::default();
        assert_ne!(
            d.match_key(&halftime_match(json!(3.5))),
            d.match_key(&halftime_match(json!(3.75)))
        );
    }

    #[test]
    fn key_without_id_or_lines() {
        let m = MatchRecord::new(json!({"status_id": 3}));
        assert_eq!(OuDetector::default().match_key(&m), "unknown__halftime");
    }
}
