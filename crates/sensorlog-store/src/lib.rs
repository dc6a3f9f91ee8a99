//! Local persistence for sensorlog readings.
//!
//! This crate provides SQLite-based storage for readings received over the
//! serial line, together with the read-only views the dashboard needs.
//!
//! # Features
//!
//! - Append-only `sensor_data` table with store-assigned ids and timestamps
//! - Last-N readings per device, oldest first, for charting
//! - Device discovery through the ids present in stored readings
//! - Full-table listing, CSV export and a counter-resetting clear
//!
//! # Example
//!
//! ```no_run
//! use sensorlog_store::Store;
//!
//! let store = Store::open_default()?;
//! store.insert(&["18", "55.2", "23.1", "1.8"])?;
//!
//! for reading in store.last_n(18, 15)? {
//!     println!("{} {:.1}%", reading.timestamp, reading.humidity);
//! }
//! # Ok::<(), sensorlog_store::Error>(())
//! ```

mod error;
mod models;
mod queries;
mod schema;
mod store;

pub use error::{Error, Result};
pub use models::{
    DeviceSummary, ReadingRow, StoredReading, TIMESTAMP_FORMAT, format_timestamp, parse_timestamp,
};
pub use queries::ReadingQuery;
pub use schema::{READINGS_TABLE, SCHEMA_VERSION};
pub use store::Store;

/// Default database path following platform conventions.
///
/// - Linux: `~/.local/share/sensorlog/sensor_data.db`
/// - macOS: `~/Library/Application Support/sensorlog/sensor_data.db`
/// - Windows: `C:\Users\<user>\AppData\Local\sensorlog\sensor_data.db`
pub fn default_db_path() -> std::path::PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| std::path::PathBuf::from("."))
        .join("sensorlog")
        .join("sensor_data.db")
}
