//! OU Halftime Alert - Logger
//! Plain-text alert log (append-only) echoed to stdout, Eastern-time helpers

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use chrono_tz::America::New_York;
use chrono_tz::Tz;
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::warn;

// ── Eastern time ─────────────────────────────────────────────────────────────

pub fn now_eastern() -> DateTime<Tz> {
    Utc::now().with_timezone(&New_York)
}

/// "10/19/2026 03:41:07 PM EDT"
pub fn eastern_stamp(at: &DateTime<Tz>) -> String {
    at.format("%m/%d/%Y %I:%M:%S %p %Z").to_string()
}

/// Calendar day in Eastern time, "YYYY-MM-DD"
pub fn eastern_date(at: &DateTime<Tz>) -> String {
    at.format("%Y-%m-%d").to_string()
}

// ── AlertLog ─────────────────────────────────────────────────────────────────

/// Alert report sink. Every line goes to the log file and to stdout.
///
/// The file is opened lazily on the first line, so a run that never reports
/// anything leaves no file behind. Buffered output is flushed on drop.
pub struct AlertLog {
    path:      PathBuf,
    max_bytes: Option<u64>,
    echo:      bool,
    file:      Option<BufWriter<File>>,
    failed:    bool,
}

impl AlertLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path:      path.into(),
            max_bytes: None,
            echo:      true,
            file:      None,
            failed:    false,
        }
    }

    /// Rotate the existing file to `<name>.1` when it is already this large.
    pub fn with_max_bytes(mut self, max_bytes: Option<u64>) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    /// Stop echoing lines to stdout (file only).
    pub fn without_echo(mut self) -> Self {
        self.echo = false;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Log and print one line. A file error is warned about once; stdout keeps going.
    pub fn line(&mut self, msg: &str) {
        if self.echo {
            println!("{msg}");
        }
        if self.failed {
            return;
        }
        if let Err(e) = self.write_line(msg) {
            warn!("Alert log write failed ({}): {e:#}", self.path.display());
            self.failed = true;
        }
    }

    pub fn lines<I, S>(&mut self, lines: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for l in lines {
            self.line(l.as_ref());
        }
    }

    pub fn flush(&mut self) -> Result<()> {
        if let Some(f) = self.file.as_mut() {
            f.flush().context("flush alert log")?;
        }
        Ok(())
    }

    fn write_line(&mut self, msg: &str) -> Result<()> {
        if self.file.is_none() {
            self.file = Some(self.open()?);
        }
        if let Some(f) = self.file.as_mut() {
            writeln!(f, "{msg}").context("append alert log")?;
        }
        Ok(())
    }

    fn open(&self) -> Result<BufWriter<File>> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).ok();
            }
        }
        if let Some(limit) = self.max_bytes {
            rotate_if_oversize(&self.path, limit)?;
        }
        let f = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("open {}", self.path.display()))?;
        Ok(BufWriter::new(f))
    }
}

impl Drop for AlertLog {
    fn drop(&mut self) {
        if let Err(e) = self.flush() {
            warn!("{e:#}");
        }
    }
}

fn rotate_if_oversize(path: &Path, limit: u64) -> Result<()> {
    let len = match fs::metadata(path) {
        Ok(m) => m.len(),
        Err(_) => return Ok(()),
    };
    if len < limit {
        return Ok(());
    }
    let mut rotated = path.as_os_str().to_owned();
    rotated.push(".1");
    fs::rename(path, &rotated)
        .with_context(|| format!("rotate {} ({len} bytes)", path.display()))?;
    Ok(())
}
