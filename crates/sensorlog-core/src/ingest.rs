//! The ingest loop: serial lines in, stored readings out.
//!
//! Each line goes through the parser, then the store. Lines that are not
//! data lines and data lines with garbled fields are dropped and counted;
//! only a failure of the line source itself stops the loop. There is no
//! retry and no replay of dropped lines.

use std::sync::Arc;
use std::thread::{self, JoinHandle};

use sensorlog_store::{StoredReading, Store};
use sensorlog_types::{ParseError, ValidationError, try_parse_line};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::error::{Error, Result};
use crate::metrics::{IngestSnapshot, IngestStats};
use crate::source::LineSource;

/// What happened to one input line.
#[derive(Debug)]
pub enum LineOutcome {
    /// The line was empty after trimming.
    Blank,
    /// The line is not a data line.
    Skipped(ParseError),
    /// A data line whose fields did not convert. Nothing was stored.
    Rejected(ValidationError),
    /// The store failed to write the reading.
    Failed(sensorlog_store::Error),
    /// The reading was stored.
    Stored(StoredReading),
}

impl LineOutcome {
    /// The stored reading, if the line produced one.
    pub fn stored(&self) -> Option<&StoredReading> {
        match self {
            LineOutcome::Stored(reading) => Some(reading),
            _ => None,
        }
    }
}

/// Turns lines into stored readings.
pub struct Ingestor {
    store: Store,
    stats: Arc<IngestStats>,
}

impl Ingestor {
    /// Create an ingestor writing to `store`.
    pub fn new(store: Store) -> Self {
        Self::with_stats(store, Arc::new(IngestStats::new()))
    }

    /// Create an ingestor that reports into existing counters.
    pub fn with_stats(store: Store, stats: Arc<IngestStats>) -> Self {
        Self { store, stats }
    }

    /// The counters this ingestor updates.
    pub fn stats(&self) -> &Arc<IngestStats> {
        &self.stats
    }

    /// The underlying store.
    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Process one raw line.
    pub fn process_line(&self, line: &str) -> LineOutcome {
        let line = line.trim();
        if line.is_empty() {
            return LineOutcome::Blank;
        }
        self.stats.record_line();

        let fields = match try_parse_line(line) {
            Ok(fields) => fields,
            Err(e) => {
                debug!(%line, reason = %e, "Skipping non-data line");
                self.stats.record_skipped();
                return LineOutcome::Skipped(e);
            }
        };

        match self.store.insert(&fields.tokens()) {
            Ok(reading) => {
                debug!(id = reading.id, device_id = reading.device_id, "Stored reading");
                self.stats.record_stored(reading.id);
                LineOutcome::Stored(reading)
            }
            Err(sensorlog_store::Error::Validation(e)) => {
                warn!(%line, "Discarding reading: {}", e);
                self.stats.record_rejected();
                LineOutcome::Rejected(e)
            }
            Err(e) => {
                error!(%line, "Failed to store reading: {}", e);
                self.stats.record_failed(&e);
                LineOutcome::Failed(e)
            }
        }
    }

    /// Read and process lines until cancelled or the source fails.
    ///
    /// An exhausted source ends the loop normally. Any other source error
    /// is returned. The source is dropped, and with it the serial handle
    /// released, before this returns.
    pub fn run<S: LineSource>(
        &self,
        mut source: S,
        cancel: &CancellationToken,
    ) -> Result<IngestSnapshot> {
        info!("Ingest started on {}", source.describe());
        self.stats.set_running(true);

        let result = loop {
            if cancel.is_cancelled() {
                info!("Ingest cancelled");
                break Ok(());
            }

            match source.read_line() {
                Ok(Some(line)) => {
                    self.process_line(&line);
                }
                Ok(None) => {}
                Err(Error::EndOfStream) => {
                    info!("{} exhausted", source.describe());
                    break Ok(());
                }
                Err(e) => {
                    error!("Ingest stopped, reading {} failed: {}", source.describe(), e);
                    self.stats.set_error(&e);
                    break Err(e);
                }
            }
        };

        drop(source);
        self.stats.set_running(false);

        let summary = self.stats.snapshot();
        info!(
            stored = summary.stored,
            skipped = summary.skipped,
            rejected = summary.rejected,
            "Ingest finished"
        );
        result.map(|()| summary)
    }
}

/// Handle to an ingest loop running on its own thread.
///
/// Dropping the handle without calling [`join`](Self::join) detaches the
/// thread; it is then torn down with the process.
pub struct IngestHandle {
    cancel: CancellationToken,
    stats: Arc<IngestStats>,
    thread: JoinHandle<Result<IngestSnapshot>>,
}

impl IngestHandle {
    /// Counters of the running loop.
    pub fn stats(&self) -> &Arc<IngestStats> {
        &self.stats
    }

    /// Ask the loop to stop after the current read.
    pub fn stop(&self) {
        self.cancel.cancel();
    }

    /// Whether the thread has exited.
    pub fn is_finished(&self) -> bool {
        self.thread.is_finished()
    }

    /// Wait for the thread and return the loop's result.
    pub fn join(self) -> Result<IngestSnapshot> {
        self.thread.join().map_err(|_| Error::ThreadPanicked)?
    }
}

/// Run `ingestor` over `source` on a dedicated thread named `ingest`.
pub fn spawn_ingest<S>(ingestor: Ingestor, source: S) -> Result<IngestHandle>
where
    S: LineSource + Send + 'static,
{
    let cancel = CancellationToken::new();
    let stats = Arc::clone(ingestor.stats());

    let token = cancel.clone();
    let thread = thread::Builder::new()
        .name("ingest".to_string())
        .spawn(move || ingestor.run(source, &token))
        .map_err(Error::Spawn)?;

    Ok(IngestHandle {
        cancel,
        stats,
        thread,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::ReaderSource;
    use std::io::{self, Cursor};

    fn ingestor() -> Ingestor {
        Ingestor::new(Store::open_in_memory().unwrap())
    }

    #[test]
    fn test_process_valid_line() {
        let ingestor = ingestor();
        let outcome = ingestor.process_line("Reading: 18 55.2 23.1 1.8\r\n");

        let stored = outcome.stored().unwrap();
        assert_eq!(stored.id, 1);
        assert_eq!(stored.device_id, 18);
        assert_eq!(ingestor.store().count_readings(None).unwrap(), 1);
    }

    #[test]
    fn test_process_blank_line() {
        let ingestor = ingestor();
        assert!(matches!(ingestor.process_line("   \r\n"), LineOutcome::Blank));
        assert_eq!(ingestor.stats().snapshot().lines, 0);
    }

    #[test]
    fn test_process_non_data_line_touches_nothing() {
        let ingestor = ingestor();
        let outcome = ingestor.process_line("no colon here");

        assert!(matches!(
            outcome,
            LineOutcome::Skipped(ParseError::MissingDelimiter)
        ));
        assert_eq!(ingestor.store().count_readings(None).unwrap(), 0);
        assert_eq!(ingestor.stats().snapshot().skipped, 1);
    }

    #[test]
    fn test_process_bad_field_is_rejected() {
        let ingestor = ingestor();
        ingestor.process_line("Reading: 18 55.2 23.1 1.8");

        let outcome = ingestor.process_line("Reading: 18 abc 23.1 1.8");
        assert!(matches!(outcome, LineOutcome::Rejected(_)));
        assert_eq!(ingestor.store().count_readings(None).unwrap(), 1);
        assert_eq!(ingestor.stats().snapshot().rejected, 1);
    }

    #[test]
    fn test_run_until_end_of_stream() {
        let input = "boot banner\n\
                     Reading: 18 55.2 23.1 1.8\n\
                     \n\
                     Reading: 42 40.0 19.5 0.9 extra\n\
                     Reading: 18 bad 23.1 1.8\n\
                     Reading: 18 56.0 23.0 1.7\n";
        let ingestor = ingestor();
        let summary = ingestor
            .run(ReaderSource::new(Cursor::new(input)), &CancellationToken::new())
            .unwrap();

        assert_eq!(summary.lines, 5);
        assert_eq!(summary.stored, 3);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.rejected, 1);
        assert_eq!(summary.last_id, Some(3));
        assert!(!ingestor.stats().is_running());

        let store = ingestor.store();
        assert_eq!(store.distinct_device_ids().unwrap(), vec![18, 42]);
        let last = store.last_n(18, 15).unwrap();
        let humidity: Vec<f64> = last.iter().map(|r| r.humidity).collect();
        assert_eq!(humidity, vec![55.2, 56.0]);
    }

    #[test]
    fn test_run_cancelled_before_start() {
        let ingestor = ingestor();
        let cancel = CancellationToken::new();
        cancel.cancel();

        let summary = ingestor
            .run(
                ReaderSource::new(Cursor::new("Reading: 18 55.2 23.1 1.8\n")),
                &cancel,
            )
            .unwrap();
        assert_eq!(summary.stored, 0);
    }

    struct FailingSource;

    impl LineSource for FailingSource {
        fn read_line(&mut self) -> Result<Option<String>> {
            Err(Error::Io(io::Error::new(
                io::ErrorKind::BrokenPipe,
                "device unplugged",
            )))
        }

        fn describe(&self) -> String {
            "failing source".to_string()
        }
    }

    #[test]
    fn test_run_stops_on_source_error() {
        let ingestor = ingestor();
        let err = ingestor
            .run(FailingSource, &CancellationToken::new())
            .unwrap_err();

        assert!(matches!(err, Error::Io(_)));
        let last_error = ingestor.stats().last_error().unwrap();
        assert!(last_error.contains("device unplugged"));
    }

    /// Never produces a line, like an idle serial port.
    struct IdleSource;

    impl LineSource for IdleSource {
        fn read_line(&mut self) -> Result<Option<String>> {
            thread::sleep(std::time::Duration::from_millis(5));
            Ok(None)
        }

        fn describe(&self) -> String {
            "idle source".to_string()
        }
    }

    #[test]
    fn test_spawned_loop_stops_on_request() {
        let handle = spawn_ingest(ingestor(), IdleSource).unwrap();
        handle.stop();
        let summary = handle.join().unwrap();
        assert_eq!(summary.stored, 0);
    }

    #[test]
    fn test_spawned_loop_writes_to_shared_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("readings.db");

        let ingestor = Ingestor::new(Store::open(&path).unwrap());
        let source = ReaderSource::new(Cursor::new(
            "Reading: 18 55.2 23.1 1.8\nReading: 18 56.0 23.0 1.7\n",
        ));
        let handle = spawn_ingest(ingestor, source).unwrap();
        let stats = Arc::clone(handle.stats());
        let summary = handle.join().unwrap();

        assert_eq!(summary.stored, 2);
        assert_eq!(stats.stored(), 2);

        // A second connection, as the dashboard would hold, sees the rows
        let reader = Store::open(&path).unwrap();
        assert_eq!(reader.last_n(18, 15).unwrap().len(), 2);
    }
}
