//! Utility functions for CLI operations.

use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use sensorlog_core::{LineSource, ReaderSource, SerialConfig, SerialLineSource};
use sensorlog_store::Store;

/// Open the reading store at `path`, creating it if needed.
pub fn open_store(path: &Path) -> Result<Store> {
    Store::open(path)
        .with_context(|| format!("Failed to open database {}", path.display()))
}

/// Open the line source for ingestion: a capture file when `replay` is
/// given, otherwise the serial port.
pub fn open_line_source(
    serial: &SerialConfig,
    replay: Option<&Path>,
) -> Result<Box<dyn LineSource + Send>> {
    match replay {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("Failed to open replay file {}", path.display()))?;
            Ok(Box::new(ReaderSource::with_label(
                BufReader::new(file),
                format!("replay file {}", path.display()),
            )))
        }
        None => {
            let source = SerialLineSource::open(serial)?;
            Ok(Box::new(source))
        }
    }
}

/// Log file used while the dashboard owns the terminal.
pub fn log_file_path(db_path: &Path) -> PathBuf {
    db_path
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."))
        .join("sensorlog.log")
}

/// Write output to file or stdout.
pub fn write_output(output: Option<&PathBuf>, content: &str) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write to {}", path.display()))?;
        }
        None => {
            print!("{}", content);
            io::stdout().flush()?;
        }
    }
    Ok(())
}
