//! Error types for sensorlog-core.
//!
//! Line-level problems (a line that is not a data line, a field that is
//! not numeric) are not errors of the ingest loop: they are reported as
//! [`LineOutcome`](crate::LineOutcome) values and the loop carries on.
//! The variants here end ingestion or fail setup.

use std::io;

use thiserror::Error;

/// Errors that can occur while ingesting serial data.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The serial port could not be opened.
    #[error("Failed to open serial port {port}: {source}")]
    OpenPort {
        port: String,
        #[source]
        source: serialport::Error,
    },

    /// Reading from the line source failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The line source has no more data.
    #[error("End of input stream")]
    EndOfStream,

    /// The reading store failed.
    #[error("Store error: {0}")]
    Store(#[from] sensorlog_store::Error),

    /// The ingest thread could not be started.
    #[error("Failed to spawn ingest thread: {0}")]
    Spawn(#[source] io::Error),

    /// The ingest thread panicked.
    #[error("Ingest thread panicked")]
    ThreadPanicked,
}

/// Result type alias using sensorlog-core's Error type.
pub type Result<T> = std::result::Result<T, Error>;
