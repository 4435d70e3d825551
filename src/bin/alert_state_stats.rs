use anyhow::Result;
use alert_state::{load_config, load_daily_count, load_processed, AlertConfig};
use chrono::Utc;
use logger::{eastern_date, now_eastern};
use ou_halftime_alert::AlertPaths;

fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let paths = AlertPaths::from_env();
    let today = eastern_date(&now_eastern());

    println!("snapshot={}", paths.snapshot.display());

    let config = match load_config(&paths.config) {
        Ok(c) => c,
        Err(e) => {
            println!("config: {e} (defaults apply)");
            AlertConfig::default()
        }
    };
    println!(
        "config: enabled={} min_ou_line={} processed_ttl_days={:?} log_max_bytes={:?}",
        config.enabled,
        config.criteria.min_ou_line,
        config.retention.processed_ttl_days,
        config.retention.log_max_bytes,
    );

    match load_processed(&paths.processed, Utc::now()) {
        Ok(p) => {
            let last = if p.last_fetch_time.is_empty() { "<none>" } else { p.last_fetch_time.as_str() };
            println!("processed_keys: {}", p.len());
            println!("last_fetch_time: {last}");
        }
        Err(e) => println!("processed: {e}"),
    }

    match load_daily_count(&paths.daily_counter, &today) {
        Ok(d) => println!("daily_count: {} ({})", d.count, d.date),
        Err(e) => println!("daily_count: {e}"),
    }

    match std::fs::metadata(&paths.log) {
        Ok(m) => println!("log: {} ({} bytes)", paths.log.display(), m.len()),
        Err(_) => println!("log: <none>"),
    }

    Ok(())
}
