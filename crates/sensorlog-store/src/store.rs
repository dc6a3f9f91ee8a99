//! Main store implementation.

use std::io::Write;
use std::path::Path;
use std::time::Duration;

use chrono::{Local, NaiveDateTime, Timelike};
use rusqlite::types::Type;
use rusqlite::{Connection, Row};
use tracing::{debug, info};

use sensorlog_types::Reading;

use crate::error::{Error, Result};
use crate::models::{DeviceSummary, ReadingRow, StoredReading, format_timestamp, parse_timestamp};
use crate::queries::ReadingQuery;
use crate::schema;

/// How long a writer waits for the other connection to release its lock.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// SQLite-based store for sensor readings.
///
/// A `Store` wraps a single connection and is not `Sync`. Threads that need
/// access open their own `Store` on the same path.
pub struct Store {
    conn: Connection,
}

impl Store {
    /// Open or create a database at the given path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| Error::CreateDirectory {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        info!("Opening database at {}", path.display());
        let conn = Connection::open(path)?;

        // The ingest thread and the dashboard hold separate connections
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;",
        )?;
        conn.busy_timeout(BUSY_TIMEOUT)?;

        let store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    /// Open the default database location.
    pub fn open_default() -> Result<Self> {
        Self::open(crate::default_db_path())
    }

    /// Open an in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self> {
        let store = Self {
            conn: Connection::open_in_memory()?,
        };
        store.init_schema()?;
        Ok(store)
    }

    /// Ensure the readings table exists. Idempotent.
    pub fn init_schema(&self) -> Result<()> {
        schema::initialize(&self.conn)
    }
}

fn stored_reading_from_row(row: &Row<'_>) -> rusqlite::Result<StoredReading> {
    Ok(StoredReading {
        id: row.get(0)?,
        device_id: row.get(1)?,
        humidity: measurement_column(row, 2)?,
        temperature: measurement_column(row, 3)?,
        ec: measurement_column(row, 4)?,
        timestamp: timestamp_column(row, 5)?,
    })
}

/// SQLite stores a bound NaN as NULL; read it back as NaN.
fn measurement_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<f64> {
    Ok(row.get::<_, Option<f64>>(idx)?.unwrap_or(f64::NAN))
}

fn timestamp_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<NaiveDateTime> {
    let text: String = row.get(idx)?;
    parse_timestamp(&text)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

/// Current local time truncated to whole seconds.
fn now_local() -> NaiveDateTime {
    let now = Local::now().naive_local();
    now.with_nanosecond(0).unwrap_or(now)
}

// Write operations
impl Store {
    /// Convert raw tokens and insert them as one reading.
    ///
    /// Tokens are in wire order: device id, humidity, temperature, ec.
    /// If any token fails to convert, nothing is written and
    /// [`Error::Validation`] is returned.
    pub fn insert<S: AsRef<str>>(&self, tokens: &[S]) -> Result<StoredReading> {
        let reading = Reading::from_tokens(tokens)?;
        self.insert_reading(&reading)
    }

    /// Insert a reading, stamping it with the current local time.
    pub fn insert_reading(&self, reading: &Reading) -> Result<StoredReading> {
        let timestamp = now_local();

        self.conn.execute(
            "INSERT INTO sensor_data (dev_id, humidity, temperature, ec, timestamp)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            rusqlite::params![
                reading.device_id,
                reading.humidity,
                reading.temperature,
                reading.ec,
                format_timestamp(&timestamp),
            ],
        )?;

        let id = self.conn.last_insert_rowid();
        debug!(id, device_id = reading.device_id, "Inserted reading");

        Ok(StoredReading {
            id,
            device_id: reading.device_id,
            humidity: reading.humidity,
            temperature: reading.temperature,
            ec: reading.ec,
            timestamp,
        })
    }

    /// Delete every reading and reset the id counter.
    ///
    /// The next insert is numbered 1 again. Returns the number of rows
    /// deleted.
    pub fn clear_all(&self) -> Result<usize> {
        let tx = self.conn.unchecked_transaction()?;
        let deleted = tx.execute("DELETE FROM sensor_data", [])?;
        tx.execute("DELETE FROM sqlite_sequence WHERE name = 'sensor_data'", [])?;
        tx.commit()?;

        info!(deleted, "Cleared all readings");
        Ok(deleted)
    }
}

// Query facade
impl Store {
    /// The `n` most recent readings for a device, oldest first.
    ///
    /// Returns fewer than `n` readings if the device has fewer, and an empty
    /// vector for an unknown device.
    pub fn last_n(&self, device_id: i64, n: u32) -> Result<Vec<StoredReading>> {
        let query = ReadingQuery::new().device(device_id).limit(n);
        let mut readings = self.query_readings(&query)?;
        readings.reverse();
        Ok(readings)
    }

    /// Every device id present in stored readings, ascending.
    pub fn distinct_device_ids(&self) -> Result<Vec<i64>> {
        let mut stmt = self
            .conn
            .prepare("SELECT DISTINCT dev_id FROM sensor_data ORDER BY dev_id")?;

        let ids = stmt
            .query_map([], |row| row.get(0))?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(ids)
    }

    /// Every stored reading without its id, newest first.
    pub fn all_rows(&self) -> Result<Vec<ReadingRow>> {
        let readings = self.query_readings(&ReadingQuery::new())?;
        Ok(readings.iter().map(StoredReading::to_row).collect())
    }

    /// Query readings with filters.
    pub fn query_readings(&self, query: &ReadingQuery) -> Result<Vec<StoredReading>> {
        let sql = query.build_sql();
        let (_, params) = query.build_where();

        debug!("Executing query: {}", sql);

        let params_ref: Vec<&dyn rusqlite::ToSql> = params.iter().map(|p| p.as_ref()).collect();

        let mut stmt = self.conn.prepare(&sql)?;
        let readings = stmt
            .query_map(params_ref.as_slice(), stored_reading_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(readings)
    }

    /// Count readings, optionally for one device.
    pub fn count_readings(&self, device_id: Option<i64>) -> Result<u64> {
        let count: i64 = match device_id {
            Some(id) => self.conn.query_row(
                "SELECT COUNT(*) FROM sensor_data WHERE dev_id = ?",
                [id],
                |row| row.get(0),
            )?,
            None => self
                .conn
                .query_row("SELECT COUNT(*) FROM sensor_data", [], |row| row.get(0))?,
        };

        Ok(count as u64)
    }

    /// Per-device reading counts with first and last timestamps.
    pub fn device_summaries(&self) -> Result<Vec<DeviceSummary>> {
        let mut stmt = self.conn.prepare(
            "SELECT dev_id, COUNT(*), MIN(timestamp), MAX(timestamp)
             FROM sensor_data GROUP BY dev_id ORDER BY dev_id",
        )?;

        let summaries = stmt
            .query_map([], |row| {
                Ok(DeviceSummary {
                    device_id: row.get(0)?,
                    readings: row.get::<_, i64>(1)? as u64,
                    first_seen: timestamp_column(row, 2)?,
                    last_seen: timestamp_column(row, 3)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(summaries)
    }

    /// Write matching readings as CSV. Returns the number of records written.
    pub fn export_csv<W: Write>(&self, writer: W, query: &ReadingQuery) -> Result<usize> {
        let readings = self.query_readings(query)?;
        let mut csv = csv::Writer::from_writer(writer);

        csv.write_record(["id", "device_id", "humidity", "temperature", "ec", "timestamp"])?;
        for r in &readings {
            csv.write_record([
                r.id.to_string(),
                r.device_id.to_string(),
                r.humidity.to_string(),
                r.temperature.to_string(),
                r.ec.to_string(),
                format_timestamp(&r.timestamp),
            ])?;
        }
        csv.flush()?;

        info!(records = readings.len(), "Exported readings to CSV");
        Ok(readings.len())
    }
}
