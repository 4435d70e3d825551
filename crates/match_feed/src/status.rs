//! Upstream match status enumeration

use serde_json::Value;

use crate::value::display_value;

pub const HALF_TIME_STATUS_ID: i64 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchStatus {
    NotStarted,
    FirstHalf,
    HalfTimeBreak,
    SecondHalf,
    ExtraTime,
    PenaltyShootout,
    Finished,
    FinishedAlt,
    Postponed,
    Canceled,
    ToBeAnnounced,
    Interrupted,
    Abandoned,
    Suspended,
}

impl MatchStatus {
    pub fn from_id(id: i64) -> Option<Self> {
        let status = match id {
            1  => Self::NotStarted,
            2  => Self::FirstHalf,
            3  => Self::HalfTimeBreak,
            4  => Self::SecondHalf,
            5  => Self::ExtraTime,
            6  => Self::PenaltyShootout,
            7  => Self::Finished,
            8  => Self::FinishedAlt,
            9  => Self::Postponed,
            10 => Self::Canceled,
            11 => Self::ToBeAnnounced,
            12 => Self::Interrupted,
            13 => Self::Abandoned,
            14 => Self::Suspended,
            _  => return None,
        };
        Some(status)
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::NotStarted      => "Not started",
            Self::FirstHalf       => "First half",
            Self::HalfTimeBreak   => "Half-time break",
            Self::SecondHalf      => "Second half",
            Self::ExtraTime       => "Extra time",
            Self::PenaltyShootout => "Penalty shootout",
            Self::Finished | Self::FinishedAlt => "Finished",
            Self::Postponed       => "Postponed",
            Self::Canceled        => "Canceled",
            Self::ToBeAnnounced   => "To be announced",
            Self::Interrupted     => "Interrupted",
            Self::Abandoned       => "Abandoned",
            Self::Suspended       => "Suspended",
        }
    }
}

/// Integral status id from a feed value (`3` or `3.0`, never `"3"`).
pub fn status_id_of(v: &Value) -> Option<i64> {
    let f = v.as_f64()?;
    if f.fract() == 0.0 && f.abs() <= i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}

/// "Half-time break", or "Unknown Status (<id>)" for ids outside the table.
pub fn status_description(v: &Value) -> String {
    status_id_of(v)
        .and_then(MatchStatus::from_id)
        .map(|s| s.description().to_string())
        .unwrap_or_else(|| format!("Unknown Status ({})", display_value(v)))
}
