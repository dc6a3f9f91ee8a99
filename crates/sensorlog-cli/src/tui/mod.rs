//! Terminal dashboard.
//!
//! Starts the ingest thread on its own store connection, then runs the
//! render/input loop on the calling thread with a second connection to
//! the same database file.

pub mod app;
pub mod input;
pub mod ui;

pub use app::App;

use std::io::{self, stdout};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    ExecutableCommand,
    event::{self, Event, KeyEventKind},
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::prelude::*;
use sensorlog_core::{IngestHandle, Ingestor, SerialConfig, spawn_ingest};
use tracing::{error, info};

use crate::config::DashboardConfig;
use crate::util::{open_line_source, open_store};

/// Input poll timeout; also bounds how stale the clock and counters get.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Set up the terminal for TUI rendering.
pub fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout());
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore the terminal to its original state.
pub fn restore_terminal() -> Result<()> {
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;
    Ok(())
}

/// Run the dashboard until the user quits.
///
/// A line source that cannot be opened does not stop the dashboard; the
/// stored data is still browsable and the error is shown in the status bar.
pub fn run(
    db_path: &Path,
    serial: &SerialConfig,
    replay: Option<&Path>,
    dashboard: &DashboardConfig,
) -> Result<()> {
    let mut app = App::new(
        open_store(db_path)?,
        dashboard.window,
        dashboard.refresh_interval(),
    );

    let ingest = match start_ingest(db_path, serial, replay) {
        Ok((handle, label)) => {
            app = app.with_ingest(Arc::clone(handle.stats()), label);
            Some(handle)
        }
        Err(e) => {
            error!("Not logging: {:#}", e);
            app.startup_error = Some(format!("{:#}", e));
            None
        }
    };

    let mut terminal = setup_terminal()?;
    let result = run_event_loop(&mut terminal, &mut app);
    restore_terminal()?;

    if let Some(handle) = ingest {
        handle.stop();
        match handle.join() {
            Ok(summary) => info!(stored = summary.stored, "Dashboard closed"),
            Err(e) => error!("Ingest ended with error: {}", e),
        }
    }

    result
}

fn start_ingest(
    db_path: &Path,
    serial: &SerialConfig,
    replay: Option<&Path>,
) -> Result<(IngestHandle, String)> {
    let store = open_store(db_path)?;
    let source = open_line_source(serial, replay)?;
    let label = source.describe();
    let handle = spawn_ingest(Ingestor::new(store), source)?;
    Ok((handle, label))
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    while !app.should_quit() {
        app.clean_expired_messages();
        app.check_auto_refresh();

        terminal.draw(|f| ui::draw(f, app))?;

        if event::poll(POLL_INTERVAL)?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            let action = input::handle_key(key.code);
            input::apply_action(app, action);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_ingest_from_replay() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("sensor_data.db");
        let capture = dir.path().join("capture.txt");
        std::fs::write(&capture, "Reading: 18 55.2 23.1 1.8\nReading: 42 40.0 19.5 0.9\n").unwrap();

        let (handle, label) = start_ingest(&db, &SerialConfig::default(), Some(&capture)).unwrap();
        assert!(label.contains("capture.txt"));
        assert_eq!(handle.join().unwrap().stored, 2);

        let mut app = App::new(open_store(&db).unwrap(), 15, Duration::from_secs(1));
        app.refresh();
        assert_eq!(app.devices, vec![18, 42]);
    }
}
