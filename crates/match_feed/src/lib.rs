//! OU Halftime Alert - Match Feed
//!
//! Reads the upstream live-match snapshot (a `history` of fetch batches, or one
//! flat batch) and exposes each match as a loosely typed [`MatchRecord`].
//! Field access never fails: absent or oddly typed values fall back per field.

pub mod status;
pub mod value;

use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

pub use status::{status_description, MatchStatus, HALF_TIME_STATUS_ID};
pub use value::{coerce_score, display_value, line_value, number_label};

/// `generated_at` placeholder when a batch carries none.
pub const UNKNOWN_FETCH_TIME: &str = "Unknown";

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("snapshot not found at {}", .0.display())]
    Missing(PathBuf),
    #[error("failed to read snapshot {}: {source}", path.display())]
    Read { path: PathBuf, source: std::io::Error },
    #[error("failed to parse snapshot {}: {source}", path.display())]
    Parse { path: PathBuf, source: serde_json::Error },
    #[error("unexpected snapshot shape: {0}")]
    Shape(&'static str),
}

// ── Batch ────────────────────────────────────────────────────────────────────

/// One fetch of the upstream feed.
#[derive(Debug, Clone, PartialEq)]
pub struct Batch {
    pub generated_at: String,
    /// In document order.
    pub matches:      Vec<(String, MatchRecord)>,
}

impl Batch {
    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    pub fn records(&self) -> impl Iterator<Item = &MatchRecord> {
        self.matches.iter().map(|(_, m)| m)
    }
}

/// Load the snapshot file and keep only its most recent batch.
pub fn load_latest_batch(path: &Path) -> Result<Batch, FeedError> {
    if !path.exists() {
        return Err(FeedError::Missing(path.to_path_buf()));
    }
    let raw = std::fs::read_to_string(path).map_err(|source| FeedError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let doc: Value = serde_json::from_str(&raw).map_err(|source| FeedError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    latest_batch(&doc)
}

/// Last element of `history` when it is a non-empty array, else the document itself.
pub fn latest_batch(doc: &Value) -> Result<Batch, FeedError> {
    let root = doc.as_object().ok_or(FeedError::Shape("top level is not an object"))?;

    let batch = match root.get("history") {
        Some(Value::Array(items)) if !items.is_empty() => items
            .last()
            .and_then(Value::as_object)
            .ok_or(FeedError::Shape("latest history entry is not an object"))?,
        Some(h) if is_truthy(h) => return Err(FeedError::Shape("history is not an array")),
        _ => root,
    };

    Ok(batch_from(batch))
}

fn batch_from(obj: &Map<String, Value>) -> Batch {
    let generated_at = match obj.get("generated_at") {
        None               => UNKNOWN_FETCH_TIME.to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other)        => other.to_string(),
    };

    let matches = match obj.get("matches") {
        Some(Value::Object(m)) => m
            .iter()
            .map(|(k, v)| (k.clone(), MatchRecord::new(v.clone())))
            .collect(),
        Some(other) => {
            debug!("matches is not an object ({}), treating batch as empty", kind(other));
            Vec::new()
        }
        None => Vec::new(),
    };

    Batch { generated_at, matches }
}

fn is_truthy(v: &Value) -> bool {
    match v {
        Value::Null      => false,
        Value::Bool(b)   => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a)  => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

fn kind(v: &Value) -> &'static str {
    match v {
        Value::Null      => "null",
        Value::Bool(_)   => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_)  => "array",
        Value::Object(_) => "object",
    }
}

// ── MatchRecord ──────────────────────────────────────────────────────────────

/// One match as delivered by the feed.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchRecord {
    raw: Value,
}

/// One entry of the `over_under` group.
#[derive(Debug, Clone, Copy)]
pub struct OuLine<'a> {
    pub key:   &'a str,
    pub line:  Option<&'a Value>,
    pub over:  Option<&'a Value>,
    pub under: Option<&'a Value>,
    pub time:  Option<&'a Value>,
}

impl OuLine<'_> {
    /// Numeric line, if the entry has one.
    pub fn value(&self) -> Option<f64> {
        line_value(self.line)
    }
}

impl MatchRecord {
    pub fn new(raw: Value) -> Self {
        Self { raw }
    }

    pub fn raw(&self) -> &Value {
        &self.raw
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.raw.get(key)
    }

    /// Field rendered as text, `None` when absent.
    pub fn text(&self, key: &str) -> Option<String> {
        self.get(key).map(display_value)
    }

    pub fn text_or(&self, key: &str, default: &str) -> String {
        self.text(key).unwrap_or_else(|| default.to_string())
    }

    pub fn match_id(&self) -> Option<String> {
        self.text("match_id")
    }

    /// `status_id`, ignoring an explicit null.
    pub fn status_id(&self) -> Option<&Value> {
        self.get("status_id").filter(|v| !v.is_null())
    }

    pub fn has_status(&self, id: i64) -> bool {
        self.status_id().and_then(status::status_id_of) == Some(id)
    }

    pub fn home_score(&self) -> Option<i64> {
        coerce_score(self.get("home_score"))
    }

    pub fn away_score(&self) -> Option<i64> {
        coerce_score(self.get("away_score"))
    }

    /// Object entries of `over_under`, in document order.
    pub fn over_under(&self) -> Vec<OuLine<'_>> {
        let Some(group) = self.get("over_under").and_then(Value::as_object) else {
            return Vec::new();
        };
        group
            .iter()
            .filter_map(|(key, entry)| {
                let entry = entry.as_object()?;
                Some(OuLine {
                    key,
                    line:  entry.get("line"),
                    over:  entry.get("over"),
                    under: entry.get("under"),
                    time:  entry.get("time"),
                })
            })
            .collect()
    }

    /// A non-empty object group such as `full_time_result` or `spread`.
    pub fn group(&self, key: &str) -> Option<&Map<String, Value>> {
        self.get(key).and_then(Value::as_object).filter(|g| !g.is_empty())
    }

    pub fn environment(&self) -> Option<&Map<String, Value>> {
        self.group("environment")
    }

    /// Precomputed environment lines; empty when missing or not a list.
    pub fn environment_summary(&self) -> Vec<String> {
        self.get("environment_summary")
            .and_then(Value::as_array)
            .map(|lines| lines.iter().map(display_value).collect())
            .unwrap_or_default()
    }
}
