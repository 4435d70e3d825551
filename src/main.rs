/// OU Halftime Alert - scheduled entry point
///
/// Co dělá:
///   1. Načte poslední batch ze step5 snapshotu
///   2. Najde zápasy v poločase, 0-0, s O/U linií >= 3.0
///   3. Každý zápas alertuje jen jednou (processed_matches.json)
///   4. Zapíše report do ou_3_no_score.log + stdout, zvedne denní počítadlo
///
/// Spuštění (cron, každou minutu):
///   cargo run --bin ou-halftime-alert

use anyhow::Result;
use dotenv::dotenv;
use ou_halftime_alert::{AlertCycle, AlertPaths};
use std::env;
use std::fs::File;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> Result<()> {
    dotenv().ok();

    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info"))
        )
        .with_target(false)
        .init();

    let paths = AlertPaths::from_env();
    info!("Snapshot: {}", paths.snapshot.display());

    let ran = exclusive("ou_halftime_alert.lock", || {
        let found = AlertCycle::new(paths).run();
        info!("OU3 No Score Alert completed: {} qualifying half-time break matches found", found.len());
    });
    if ran.is_none() {
        warn!("Alert lock not acquired, another run is probably in progress. Exiting.");
    }

    Ok(())
}

/// Run `f` while holding an exclusive lock on `<temp dir>/<name>`.
/// `None` when the lock is held elsewhere or cannot be created; `f` is not called.
fn exclusive<R>(name: &str, f: impl FnOnce() -> R) -> Option<R> {
    let path = env::temp_dir().join(name);
    let file = match File::create(&path) {
        Ok(f) => f,
        Err(e) => {
            warn!("Failed to create lock file at {}: {e}", path.display());
            return None;
        }
    };
    let mut lock = fd_lock::RwLock::new(file);
    let _guard = lock.try_write().ok()?;
    Some(f())
}
