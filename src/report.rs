//! Alert report rendering. Pure: every function returns the lines to write.

use match_feed::{display_value, status_description, MatchRecord};
use ou_detector::OuDetector;
use serde_json::{Map, Value};

const WIDTH: usize = 80;
const NA: &str = "N/A";

fn rule(ch: char) -> String {
    ch.to_string().repeat(WIDTH)
}

fn centered(text: &str) -> String {
    format!("{text:^WIDTH$}")
}

fn field(group: &Map<String, Value>, key: &str) -> Option<String> {
    group.get(key).map(display_value)
}

fn field_or_na(group: &Map<String, Value>, key: &str) -> String {
    field(group, key).unwrap_or_else(|| NA.to_string())
}

/// Banner opening one alert cycle.
pub fn cycle_header(min_line: f64, alert_time: &str, found: usize, scanned: usize) -> Vec<String> {
    vec![
        String::new(),
        rule('='),
        centered(&format!("OU {min_line:.1}+ SCORELESS HALF TIME ALERT CYCLE - 0-0 HALF-TIME ONLY")),
        centered(&format!("Alert Time: {alert_time}")),
        centered(&format!("NEW Half-time Matches Found: {found} of {scanned} scanned")),
        rule('='),
    ]
}

/// Placed between two match blocks of the same cycle.
pub fn match_separator() -> Vec<String> {
    vec![String::new(), rule('-')]
}

/// Full block for one alerted match. `daily_number` is the running count for the day.
pub fn match_block(m: &MatchRecord, daily_number: u32, found_at: &str, detector: &OuDetector) -> Vec<String> {
    let mut out = vec![
        String::new(),
        rule('='),
        centered(&format!("OU {:.1}+ SCORELESS HALF TIME ALERT #{daily_number}", detector.min_line())),
        centered(&format!("Found: {found_at}")),
        centered(&format!("Match ID: {}", m.text_or("match_id", NA))),
        centered(&format!("Competition ID: {}", m.text_or("competition_id", NA))),
        rule('='),
        String::new(),
        format!("Competition: {} ({})", m.text_or("competition", "None"), m.text_or("country", "None")),
        format!("Match: {} vs {}", m.text_or("home_team", "None"), m.text_or("away_team", "None")),
        format!("Score: {}", m.text_or("score", NA)),
        format!("Status: {}", status_line(m)),
    ];
    out.extend(odds_section(m, detector));
    out.extend(environment_section(m));
    out
}

fn status_line(m: &MatchRecord) -> String {
    match m.status_id() {
        Some(id) => format!("{} (ID: {})", status_description(id), display_value(id)),
        None => m.text_or("status", "Unknown"),
    }
}

// ── Odds ─────────────────────────────────────────────────────────────────────

pub fn odds_section(m: &MatchRecord, detector: &OuDetector) -> Vec<String> {
    let mut out = vec![String::new(), "--- MATCH BETTING ODDS ---".to_string()];
    let mut any = false;

    if let Some(ftr) = m.group("full_time_result") {
        if ["home", "draw", "away"].iter().any(|k| ftr.contains_key(*k)) {
            out.push(format!(
                "│ ML:     │ Home: {:<4} │ Draw: {:<5} │ Away: {:<5} │ (@{}')",
                field_or_na(ftr, "home"),
                field_or_na(ftr, "draw"),
                field_or_na(ftr, "away"),
                field_or_na(ftr, "time"),
            ));
            any = true;
        }
    }

    if let Some(spread) = m.group("spread") {
        if ["home", "away"].iter().any(|k| spread.contains_key(*k)) {
            out.push(format!(
                "│ Spread: │ Home: {:<4} │ Hcap: {:<5} │ Away: {:<5} │ (@{}')",
                field_or_na(spread, "home"),
                field_or_na(spread, "handicap"),
                field_or_na(spread, "away"),
                field_or_na(spread, "time"),
            ));
            any = true;
        }
    }

    let mut lines: Vec<_> = m
        .over_under()
        .into_iter()
        .filter_map(|l| l.value().map(|v| (v, l)))
        .collect();
    lines.sort_by(|a, b| a.0.total_cmp(&b.0));

    for (_, l) in &lines {
        let star = if detector.is_qualifying(l) { " ★" } else { "" };
        out.push(format!(
            "│ O/U:    │ Over: {:<4} │ Line: {:<5} │ Under: {:<4} │ (@{}'){}",
            l.over.map_or_else(|| NA.to_string(), display_value),
            l.line.map_or_else(|| NA.to_string(), display_value),
            l.under.map_or_else(|| NA.to_string(), display_value),
            l.time.map_or_else(|| NA.to_string(), display_value),
            star,
        ));
        any = true;
    }

    if !any {
        out.push("No betting odds available".to_string());
    }
    out
}

// ── Environment ──────────────────────────────────────────────────────────────

pub fn environment_section(m: &MatchRecord) -> Vec<String> {
    let mut out = vec![String::new(), "--- MATCH ENVIRONMENT ---".to_string()];
    let summary = m.environment_summary();
    let env = m.environment();

    if !summary.is_empty() {
        // summary lines usually lack the weather
        let weather = env
            .and_then(|e| e.get("weather_description"))
            .map(display_value)
            .filter(|w| !w.is_empty() && w != "None");
        if let Some(w) = weather {
            out.push(format!("Weather: {w}"));
        }
        out.extend(summary);
    } else if let Some(env) = env {
        out.push(format!("Weather: {}", field(env, "weather_description").unwrap_or_else(|| "Unknown".into())));
        out.push(format!("Temperature: {}", field(env, "temperature").unwrap_or_else(|| "None".into())));
        out.push(format!(
            "Wind: {}, {} {}",
            field(env, "wind_description").unwrap_or_else(|| "Calm".into()),
            field(env, "wind_value").unwrap_or_else(|| "None".into()),
            field(env, "wind_unit").unwrap_or_else(|| "None".into()),
        ));
    } else {
        out.push("No environment data available".to_string());
    }
    out
}
