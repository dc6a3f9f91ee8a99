//! Serial ingest pipeline for sensorlog.
//!
//! This crate owns the serial connection and turns raw lines into stored
//! readings:
//!
//! ```text
//! serial port ──▶ LineSource ──▶ parser ──▶ Store::insert
//! ```
//!
//! The loop runs on one dedicated thread ([`spawn_ingest`]) and talks to the
//! rest of the program only through the SQLite store and the atomic
//! [`IngestStats`] counters. Anyone who wants fresh data re-queries the
//! store.
//!
//! # Quick Start
//!
//! ```no_run
//! use sensorlog_core::{Ingestor, SerialConfig, SerialLineSource, spawn_ingest};
//! use sensorlog_store::Store;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let source = SerialLineSource::open(&SerialConfig::default())?;
//! let ingestor = Ingestor::new(Store::open_default()?);
//! let handle = spawn_ingest(ingestor, source)?;
//!
//! // ... later
//! handle.stop();
//! let summary = handle.join()?;
//! println!("stored {} readings", summary.stored);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod ingest;
pub mod metrics;
pub mod serial;
pub mod source;

pub use error::{Error, Result};
pub use ingest::{IngestHandle, Ingestor, LineOutcome, spawn_ingest};
pub use metrics::{IngestSnapshot, IngestStats};
pub use serial::{DEFAULT_BAUD_RATE, DEFAULT_PORT, DEFAULT_TIMEOUT, SerialConfig, SerialLineSource};
pub use source::{LineSource, ReaderSource};

pub use sensorlog_types::{ParseError, Reading, ValidationError};
