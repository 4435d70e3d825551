//! OU Halftime Alert
//!
//! Scans the latest live-match snapshot for scoreless half-time matches carrying
//! an over/under line of 3.0 or more, alerts each one once, and keeps a daily count.

pub mod cycle;
pub mod paths;
pub mod report;

pub use cycle::{scan_batch, AlertCycle, ScanStats};
pub use paths::AlertPaths;
