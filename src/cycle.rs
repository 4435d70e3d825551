//! One alert pass: snapshot → filter → dedup → report → persist.

use alert_state::{
    load_config, load_daily_count, load_processed, save_daily_count, save_processed, AlertConfig,
    DailyCount, ProcessedState,
};
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use logger::{eastern_date, eastern_stamp, now_eastern, AlertLog};
use match_feed::{load_latest_batch, Batch, FeedError, MatchRecord};
use ou_detector::{OuDetector, Verdict};
use tracing::{debug, info, warn};

use crate::paths::AlertPaths;
use crate::report;

/// Counters for one scan of a batch.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ScanStats {
    pub scanned:       usize,
    pub non_half_time: usize,
    pub duplicates:    usize,
}

/// Newly alerted matches in document order, keys already added to `processed`.
pub fn scan_batch(
    batch:     &Batch,
    detector:  &OuDetector,
    processed: &mut ProcessedState,
    now:       DateTime<Utc>,
) -> (Vec<MatchRecord>, ScanStats) {
    let mut stats = ScanStats { scanned: batch.len(), ..ScanStats::default() };
    let mut found = Vec::new();

    for (feed_key, m) in &batch.matches {
        match detector.evaluate(m) {
            Verdict::Qualifies => {}
            Verdict::NotHalfTime => {
                stats.non_half_time += 1;
                continue;
            }
            other => {
                debug!("{feed_key}: {other:?}");
                continue;
            }
        }

        let key = detector.match_key(m);
        if processed.contains(&key) {
            stats.duplicates += 1;
            info!(
                "Skipping duplicate - {} vs {}",
                m.text_or("home_team", "None"),
                m.text_or("away_team", "None")
            );
            continue;
        }

        processed.insert(key, now);
        found.push(m.clone());
    }

    (found, stats)
}

pub struct AlertCycle {
    paths: AlertPaths,
    echo:  bool,
}

impl AlertCycle {
    pub fn new(paths: AlertPaths) -> Self {
        Self { paths, echo: true }
    }

    /// Report to the log file only, not stdout.
    pub fn without_echo(mut self) -> Self {
        self.echo = false;
        self
    }

    pub fn paths(&self) -> &AlertPaths {
        &self.paths
    }

    pub fn run(&self) -> Vec<MatchRecord> {
        self.run_at(now_eastern())
    }

    /// Single pass at a fixed clock. Never fails: every problem is logged and
    /// at worst the pass produces no alerts.
    pub fn run_at(&self, now: DateTime<Tz>) -> Vec<MatchRecord> {
        info!("Starting over/under HALF-TIME BREAK monitoring...");

        let config = self.config();
        if !config.enabled {
            info!("Alert disabled in config");
            return Vec::new();
        }

        let mut log = AlertLog::new(&self.paths.log).with_max_bytes(config.retention.log_max_bytes);
        if !self.echo {
            log = log.without_echo();
        }

        let batch = match load_latest_batch(&self.paths.snapshot) {
            Ok(b) => b,
            Err(FeedError::Missing(path)) => {
                warn!("Snapshot not found at {}", path.display());
                return Vec::new();
            }
            Err(e) => {
                warn!("Error loading snapshot: {e}");
                return Vec::new();
            }
        };

        let now_utc = now.with_timezone(&Utc);
        let mut processed = load_processed(&self.paths.processed, now_utc).unwrap_or_else(|e| {
            warn!("{e}, starting with an empty processed set");
            ProcessedState::default()
        });

        if batch.generated_at == processed.last_fetch_time {
            info!(
                "Same fetch time as last run ({}) - skipping to avoid duplicates",
                batch.generated_at
            );
            return Vec::new();
        }
        info!("New fetch detected - {}", batch.generated_at);
        info!("Last processed fetch was - {}", processed.last_fetch_time);

        if let Some(ttl) = config.retention.processed_ttl_days {
            match processed.prune_expired(now_utc, ttl) {
                Some(0) => {}
                Some(evicted) => info!("Evicted {evicted} processed keys older than {ttl} days"),
                None => warn!("processed_ttl_days = {ttl} is out of range, skipping eviction"),
            }
        }

        let detector = OuDetector::new(config.criteria.min_ou_line);
        info!(
            "Scanning {} matches for: O/U lines >= {}, half-time break (ID=3), scoreless (0-0)",
            batch.len(),
            detector.min_line()
        );

        let (found, stats) = scan_batch(&batch, &detector, &mut processed, now_utc);
        info!(
            "Found {} NEW scoreless half-time matches with O/U lines >= {}",
            found.len(),
            detector.min_line()
        );
        info!(
            "Skipped {} duplicates, {} non-half-time-break matches",
            stats.duplicates, stats.non_half_time
        );

        if !found.is_empty() {
            self.report(&mut log, &found, &stats, &detector, &now);
        }

        processed.last_fetch_time = batch.generated_at.clone();
        if let Err(e) = save_processed(&self.paths.processed, &processed, &now) {
            warn!("Error saving processed matches: {e}");
        }

        found
    }

    fn config(&self) -> AlertConfig {
        load_config(&self.paths.config).unwrap_or_else(|e| {
            warn!("Error loading config: {e}, using defaults");
            AlertConfig::default()
        })
    }

    fn report(
        &self,
        log:      &mut AlertLog,
        found:    &[MatchRecord],
        stats:    &ScanStats,
        detector: &OuDetector,
        now:      &DateTime<Tz>,
    ) {
        let today = eastern_date(now);
        let stamp = eastern_stamp(now);
        let mut daily = load_daily_count(&self.paths.daily_counter, &today).unwrap_or_else(|e| {
            warn!("{e}, daily count restarts at 0");
            DailyCount::fresh(&today)
        });

        log.lines(report::cycle_header(detector.min_line(), &stamp, found.len(), stats.scanned));
        for (i, m) in found.iter().enumerate() {
            let n = daily.next();
            log.lines(report::match_block(m, n, &stamp, detector));
            if i + 1 < found.len() {
                log.lines(report::match_separator());
            }
        }

        if let Err(e) = save_daily_count(&self.paths.daily_counter, &daily, now) {
            warn!("Error saving daily count: {e}");
        }
        if let Err(e) = log.flush() {
            warn!("{e:#}");
        }
    }
}
