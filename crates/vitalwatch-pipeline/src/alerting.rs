//! Alert manager: durable log plus bounded live feed.
//!
//! Every alert is appended to an append-only log file (one line per
//! alert) and pushed onto an in-memory feed capped at the last
//! [`ALERT_FEED_CAPACITY`] entries for display. A failed log append is
//! reported and counted but never blocks the feed update: operator
//! visibility takes priority over log durability.

use std::collections::VecDeque;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use vitalwatch_core::{Alert, Severity};

/// Number of alerts retained in the live feed.
pub const ALERT_FEED_CAPACITY: usize = 5;

/// Edge-triggered alert sink: durable log file + bounded live feed.
#[derive(Debug)]
pub struct AlertManager {
    log_path: PathBuf,
    feed: VecDeque<Alert>,
    total_raised: u64,
    append_failures: u64,
}

impl AlertManager {
    /// Create a manager appending to `log_path`. The file is created on
    /// first alert.
    pub fn new(log_path: impl Into<PathBuf>) -> Self {
        Self {
            log_path: log_path.into(),
            feed: VecDeque::with_capacity(ALERT_FEED_CAPACITY),
            total_raised: 0,
            append_failures: 0,
        }
    }

    /// Raise an alert: stamp it, append it to the durable log, and push
    /// it onto the live feed.
    pub fn notify(&mut self, message: impl Into<String>, severity: Severity) {
        let alert = Alert::new(message, severity);
        tracing::info!(severity = %alert.severity, message = %alert.message, "alert raised");

        if let Err(e) = self.append_to_log(&alert) {
            self.append_failures += 1;
            tracing::warn!(
                path = %self.log_path.display(),
                error = %e,
                "alert log append failed, keeping alert in feed only"
            );
        }

        self.feed.push_back(alert);
        if self.feed.len() > ALERT_FEED_CAPACITY {
            self.feed.pop_front();
        }
        self.total_raised += 1;
    }

    /// Raise an alert from a severity label, coercing unrecognized labels
    /// to `info`.
    pub fn notify_label(&mut self, message: impl Into<String>, label: &str) {
        self.notify(message, Severity::from_label(label));
    }

    fn append_to_log(&self, alert: &Alert) -> std::io::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)?;
        writeln!(file, "{}", alert.log_line())
    }

    /// The live feed, oldest first (at most [`ALERT_FEED_CAPACITY`]).
    #[must_use]
    pub fn recent(&self) -> Vec<Alert> {
        self.feed.iter().cloned().collect()
    }

    /// Total alerts raised since construction (the feed is bounded, this
    /// counter is not).
    #[must_use]
    pub fn total_raised(&self) -> u64 {
        self.total_raised
    }

    /// Number of failed durable-log appends.
    #[must_use]
    pub fn append_failures(&self) -> u64 {
        self.append_failures
    }

    /// Path of the durable alert log.
    #[must_use]
    pub fn log_path(&self) -> &Path {
        &self.log_path
    }
}
