//! Application state for the dashboard.
//!
//! The dashboard never shares buffers with the ingest thread. It re-queries
//! its own store connection on a timer, after user actions, and as soon as
//! the ingest counters show that a new reading was stored. The database
//! table is fetched one page at a time, and only while its tab is shown.

use std::sync::Arc;
use std::time::{Duration, Instant};

use sensorlog_core::IngestStats;
use sensorlog_store::{ReadingQuery, ReadingRow, Store, StoredReading};
use tracing::warn;

/// How long a status message stays in the status bar.
const STATUS_MESSAGE_TIMEOUT: Duration = Duration::from_secs(5);

/// Rows fetched for one screen of the database table.
pub const DATABASE_PAGE_ROWS: u32 = 200;

/// Dashboard tabs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Graphs,
    Database,
    ByDevice,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::Graphs, Tab::Database, Tab::ByDevice];

    pub fn title(self) -> &'static str {
        match self {
            Tab::Graphs => "Graphs",
            Tab::Database => "Database",
            Tab::ByDevice => "By device",
        }
    }

    pub fn index(self) -> usize {
        match self {
            Tab::Graphs => 0,
            Tab::Database => 1,
            Tab::ByDevice => 2,
        }
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn previous(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// Main application state.
pub struct App {
    store: Store,
    /// Readings per device in charts and the by-device table.
    pub window: u32,
    pub active_tab: Tab,
    /// Device ids present in the store, ascending.
    pub devices: Vec<i64>,
    pub selected_device: usize,
    /// The newest `window` readings of the selected device, oldest first.
    pub recent: Vec<StoredReading>,
    /// Stored rows newest first, starting at `database_scroll`.
    pub rows: Vec<ReadingRow>,
    /// Number of stored rows.
    pub row_count: u64,
    /// First visible row of the database table.
    pub database_scroll: usize,
    /// Counters of the ingest thread, if one is running.
    pub ingest: Option<Arc<IngestStats>>,
    /// Where readings come from, for the header.
    pub source_label: String,
    /// Set when the line source could not be opened.
    pub startup_error: Option<String>,
    pub should_quit: bool,
    status_messages: Vec<(String, Instant)>,
    refresh_interval: Duration,
    last_refresh: Option<Instant>,
    seen_stored: u64,
}

impl App {
    pub fn new(store: Store, window: u32, refresh_interval: Duration) -> Self {
        Self {
            store,
            window,
            active_tab: Tab::default(),
            devices: Vec::new(),
            selected_device: 0,
            recent: Vec::new(),
            rows: Vec::new(),
            row_count: 0,
            database_scroll: 0,
            ingest: None,
            source_label: String::new(),
            startup_error: None,
            should_quit: false,
            status_messages: Vec::new(),
            refresh_interval,
            last_refresh: None,
            seen_stored: 0,
        }
    }

    /// Attach the counters of a running ingest loop.
    pub fn with_ingest(mut self, stats: Arc<IngestStats>, source_label: impl Into<String>) -> Self {
        self.seen_stored = stats.stored();
        self.ingest = Some(stats);
        self.source_label = source_label.into();
        self
    }

    /// The id of the selected device, if any device is known.
    pub fn selected_device_id(&self) -> Option<i64> {
        self.devices.get(self.selected_device).copied()
    }

    /// Reload everything shown from the store.
    ///
    /// Store errors are reported in the status bar and leave the previous
    /// view in place.
    pub fn refresh(&mut self) {
        self.last_refresh = Some(Instant::now());
        if let Err(e) = self.reload() {
            warn!("Dashboard refresh failed: {}", e);
            self.push_status_message(format!("Refresh failed: {}", e));
        }
    }

    fn reload(&mut self) -> sensorlog_store::Result<()> {
        let selected = self.selected_device_id();
        self.devices = self.store.distinct_device_ids()?;

        // Keep the same device selected when new ids appear before it
        self.selected_device = selected
            .and_then(|id| self.devices.iter().position(|d| *d == id))
            .unwrap_or_else(|| self.selected_device.min(self.devices.len().saturating_sub(1)));

        self.reload_recent()?;
        self.row_count = self.store.count_readings(None)?;
        self.database_scroll = self.database_scroll.min(self.last_row_index());
        if self.active_tab == Tab::Database {
            self.reload_rows()?;
        }
        Ok(())
    }

    fn reload_rows(&mut self) -> sensorlog_store::Result<()> {
        let offset = u32::try_from(self.database_scroll).unwrap_or(u32::MAX);
        let query = ReadingQuery::new().limit(DATABASE_PAGE_ROWS).offset(offset);
        self.rows = self
            .store
            .query_readings(&query)?
            .iter()
            .map(StoredReading::to_row)
            .collect();
        Ok(())
    }

    fn last_row_index(&self) -> usize {
        usize::try_from(self.row_count.saturating_sub(1)).unwrap_or(usize::MAX)
    }

    fn reload_recent(&mut self) -> sensorlog_store::Result<()> {
        self.recent = match self.selected_device_id() {
            Some(id) => self.store.last_n(id, self.window)?,
            None => Vec::new(),
        };
        Ok(())
    }

    /// Refresh when the timer expired or the ingest loop stored something.
    ///
    /// Returns whether a refresh happened.
    pub fn check_auto_refresh(&mut self) -> bool {
        let stored = self.ingest.as_ref().map(|s| s.stored());
        let new_data = stored.is_some_and(|n| n != self.seen_stored);
        let due = self
            .last_refresh
            .is_none_or(|at| at.elapsed() >= self.refresh_interval);

        if new_data || due {
            if let Some(n) = stored {
                self.seen_stored = n;
            }
            self.refresh();
            return true;
        }
        false
    }

    /// Delete all readings and reset ids. No confirmation is asked.
    pub fn clear_database(&mut self) {
        match self.store.clear_all() {
            Ok(deleted) => {
                self.push_status_message(format!("Deleted {} readings", deleted));
                self.database_scroll = 0;
                self.selected_device = 0;
            }
            Err(e) => {
                warn!("Failed to clear database: {}", e);
                self.push_status_message(format!("Clear failed: {}", e));
            }
        }
        self.refresh();
    }

    pub fn select_next_device(&mut self) {
        if !self.devices.is_empty() {
            self.selected_device = (self.selected_device + 1) % self.devices.len();
            self.on_selection_changed();
        }
    }

    pub fn select_previous_device(&mut self) {
        if !self.devices.is_empty() {
            self.selected_device = self
                .selected_device
                .checked_sub(1)
                .unwrap_or(self.devices.len() - 1);
            self.on_selection_changed();
        }
    }

    fn on_selection_changed(&mut self) {
        if let Err(e) = self.reload_recent() {
            self.push_status_message(format!("Refresh failed: {}", e));
        }
    }

    pub fn scroll_database_down(&mut self, rows: usize) {
        self.database_scroll = self
            .database_scroll
            .saturating_add(rows)
            .min(self.last_row_index());
        self.on_page_changed();
    }

    pub fn scroll_database_up(&mut self, rows: usize) {
        self.database_scroll = self.database_scroll.saturating_sub(rows);
        self.on_page_changed();
    }

    fn on_page_changed(&mut self) {
        if let Err(e) = self.reload_rows() {
            self.push_status_message(format!("Refresh failed: {}", e));
        }
    }

    pub fn next_tab(&mut self) {
        self.active_tab = self.active_tab.next();
        self.on_tab_changed();
    }

    pub fn previous_tab(&mut self) {
        self.active_tab = self.active_tab.previous();
        self.on_tab_changed();
    }

    fn on_tab_changed(&mut self) {
        if self.active_tab == Tab::Database {
            self.on_page_changed();
        }
    }

    pub fn push_status_message(&mut self, message: String) {
        self.status_messages.push((message, Instant::now()));
        while self.status_messages.len() > 5 {
            self.status_messages.remove(0);
        }
    }

    pub fn clean_expired_messages(&mut self) {
        self.status_messages
            .retain(|(_, created)| created.elapsed() < STATUS_MESSAGE_TIMEOUT);
    }

    pub fn current_status_message(&self) -> Option<&str> {
        self.status_messages.last().map(|(msg, _)| msg.as_str())
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }
}
