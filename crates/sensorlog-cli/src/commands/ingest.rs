//! Ingest command - headless serial logging until Ctrl-C.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use sensorlog_core::{IngestSnapshot, Ingestor, SerialConfig, spawn_ingest};
use tracing::info;

use crate::util::{open_line_source, open_store};

/// Execute the ingest command.
///
/// Returns once the source is exhausted (replay), fails, or Ctrl-C is
/// pressed.
pub async fn cmd_ingest(
    db_path: &Path,
    serial: &SerialConfig,
    replay: Option<&Path>,
    quiet: bool,
) -> Result<()> {
    let store = open_store(db_path)?;
    let source = open_line_source(serial, replay)?;
    if !quiet {
        eprintln!("Logging {} to {}", source.describe(), db_path.display());
        eprintln!("Press Ctrl+C to stop.");
    }

    let handle = spawn_ingest(Ingestor::new(store), source)?;

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    let mut poll = tokio::time::interval(Duration::from_millis(200));

    loop {
        tokio::select! {
            _ = &mut ctrl_c => {
                info!("Interrupted, stopping ingest");
                handle.stop();
                break;
            }
            _ = poll.tick() => {
                if handle.is_finished() {
                    break;
                }
            }
        }
    }

    // The thread returns within one serial read timeout of being stopped
    let summary = tokio::task::spawn_blocking(move || handle.join())
        .await
        .context("Ingest task failed")??;

    if !quiet {
        print_summary(&summary);
    }
    Ok(())
}

fn print_summary(summary: &IngestSnapshot) {
    eprintln!(
        "{} {} stored, {} skipped, {} rejected, {} failed",
        "Done:".green(),
        summary.stored,
        summary.skipped,
        summary.rejected,
        summary.failed
    );
}
