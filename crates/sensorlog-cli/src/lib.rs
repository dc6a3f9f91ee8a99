//! Command-line interface for sensorlog.
//!
//! Reads `prefix: device humidity temperature ec` lines from a serial port,
//! stores them in SQLite, and shows them in a terminal dashboard.
//!
//! # Commands
//!
//! | Command       | Description                                   |
//! |---------------|-----------------------------------------------|
//! | `dashboard`   | Log the serial port and show live charts (default) |
//! | `ingest`      | Log the serial port without a UI              |
//! | `last`        | Most recent readings of one device            |
//! | `devices`     | Devices seen in stored readings               |
//! | `dump`        | Every stored reading                          |
//! | `export`      | Readings as CSV                               |
//! | `clear`       | Delete all readings                           |
//! | `parse`       | Check how a serial line would be handled      |
//! | `config`      | Show or create the configuration file         |
//! | `completions` | Generate shell completions                    |
//!
//! # Configuration
//!
//! Settings live in `~/.config/sensorlog/config.toml` (or platform
//! equivalent):
//!
//! ```toml
//! database = "/var/lib/sensorlog/sensor_data.db"
//!
//! [serial]
//! port = "/dev/ttyUSB0"
//! baud_rate = 115200
//! timeout_ms = 1000
//!
//! [dashboard]
//! window = 15
//! refresh_ms = 1000
//! ```
//!
//! # Environment Variables
//!
//! - `SENSORLOG_PORT`: serial device (overridden by `--port`)
//! - `SENSORLOG_DB`: database file (overridden by `--db`)
//! - `NO_COLOR`: disable colored output
//! - `RUST_LOG`: log filter
//!
//! # Examples
//!
//! ```bash
//! sensorlog --port /dev/ttyACM0
//! sensorlog ingest --replay capture.txt
//! sensorlog last --device 18 --format json
//! sensorlog export --device 18 --output device18.csv
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod format;
pub mod util;

#[cfg(feature = "tui")]
pub mod tui;

pub use sensorlog_core;
pub use sensorlog_store;
pub use sensorlog_types;
