//! Ingest counters shared between the ingest thread and its observers.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Point-in-time copy of [`IngestStats`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestSnapshot {
    /// Non-blank lines received.
    pub lines: u64,
    /// Readings written to the store.
    pub stored: u64,
    /// Lines that were not data lines.
    pub skipped: u64,
    /// Data lines with a non-numeric field.
    pub rejected: u64,
    /// Readings the store failed to write.
    pub failed: u64,
    /// Id of the most recently stored reading.
    pub last_id: Option<i64>,
}

/// Thread-safe ingest counters.
///
/// `stored` only ever grows, so an observer can compare it with the value
/// it saw last to learn whether new readings arrived.
#[derive(Debug, Default)]
pub struct IngestStats {
    lines: AtomicU64,
    stored: AtomicU64,
    skipped: AtomicU64,
    rejected: AtomicU64,
    failed: AtomicU64,
    last_id: AtomicU64,
    running: AtomicBool,
    last_error: Mutex<Option<String>>,
}

impl IngestStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_line(&self) {
        self.lines.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_stored(&self, id: i64) {
        self.last_id.store(id.max(0) as u64, Ordering::Relaxed);
        self.stored.fetch_add(1, Ordering::Release);
    }

    pub(crate) fn record_skipped(&self) {
        self.skipped.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_rejected(&self) {
        self.rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_failed(&self, error: impl ToString) {
        self.failed.fetch_add(1, Ordering::Relaxed);
        self.set_error(error);
    }

    pub(crate) fn set_running(&self, running: bool) {
        self.running.store(running, Ordering::Release);
    }

    pub(crate) fn set_error(&self, error: impl ToString) {
        if let Ok(mut slot) = self.last_error.lock() {
            *slot = Some(error.to_string());
        }
    }

    /// Number of readings stored so far.
    pub fn stored(&self) -> u64 {
        self.stored.load(Ordering::Acquire)
    }

    /// Whether the ingest loop is currently running.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// The most recent store or I/O error, if any.
    pub fn last_error(&self) -> Option<String> {
        self.last_error.lock().ok().and_then(|slot| slot.clone())
    }

    /// Get a snapshot of the current counters.
    pub fn snapshot(&self) -> IngestSnapshot {
        let stored = self.stored();
        IngestSnapshot {
            lines: self.lines.load(Ordering::Relaxed),
            stored,
            skipped: self.skipped.load(Ordering::Relaxed),
            rejected: self.rejected.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            last_id: (stored > 0).then(|| self.last_id.load(Ordering::Relaxed) as i64),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_starts_empty() {
        let stats = IngestStats::new();
        assert_eq!(stats.snapshot(), IngestSnapshot::default());
        assert!(!stats.is_running());
        assert!(stats.last_error().is_none());
    }

    #[test]
    fn test_counters() {
        let stats = IngestStats::new();
        stats.record_line();
        stats.record_line();
        stats.record_line();
        stats.record_stored(7);
        stats.record_skipped();
        stats.record_rejected();

        let snap = stats.snapshot();
        assert_eq!(snap.lines, 3);
        assert_eq!(snap.stored, 1);
        assert_eq!(snap.skipped, 1);
        assert_eq!(snap.rejected, 1);
        assert_eq!(snap.last_id, Some(7));
    }

    #[test]
    fn test_failure_records_error() {
        let stats = IngestStats::new();
        stats.record_failed("disk full");
        assert_eq!(stats.snapshot().failed, 1);
        assert_eq!(stats.last_error().as_deref(), Some("disk full"));
    }

    #[test]
    fn test_snapshot_serializes() {
        let stats = IngestStats::new();
        stats.record_stored(1);
        let json = serde_json::to_value(stats.snapshot()).unwrap();
        assert_eq!(json["stored"], 1);
        assert_eq!(json["last_id"], 1);
    }
}
