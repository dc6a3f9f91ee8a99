//! Query builder for stored readings.
//!
//! Results are ordered by insertion sequence (the surrogate key), which is
//! also chronological because timestamps are assigned at insert time.
//!
//! # Example
//!
//! ```
//! use sensorlog_store::{ReadingQuery, Store};
//!
//! let store = Store::open_in_memory()?;
//!
//! // Newest 50 readings from device 18
//! let query = ReadingQuery::new().device(18).limit(50);
//! let readings = store.query_readings(&query)?;
//!
//! // Everything, oldest first, for export
//! let all = store.query_readings(&ReadingQuery::new().oldest_first())?;
//! # Ok::<(), sensorlog_store::Error>(())
//! ```

use chrono::NaiveDateTime;

use crate::models::format_timestamp;

/// Fluent query builder for readings.
///
/// By default queries return every reading, newest first.
#[derive(Debug, Default, Clone)]
pub struct ReadingQuery {
    /// Filter by device ID.
    pub device_id: Option<i64>,
    /// Filter readings stored at or after this time.
    pub since: Option<NaiveDateTime>,
    /// Filter readings stored at or before this time.
    pub until: Option<NaiveDateTime>,
    /// Maximum number of results.
    pub limit: Option<u32>,
    /// Offset for pagination.
    pub offset: Option<u32>,
    /// Order by id descending (newest first).
    pub newest_first: bool,
}

impl ReadingQuery {
    /// Create a new query: all devices, no limit, newest first.
    pub fn new() -> Self {
        Self {
            newest_first: true,
            ..Default::default()
        }
    }

    /// Only include readings from the given device.
    pub fn device(mut self, device_id: i64) -> Self {
        self.device_id = Some(device_id);
        self
    }

    /// Filter to readings stored at or after this time.
    pub fn since(mut self, time: NaiveDateTime) -> Self {
        self.since = Some(time);
        self
    }

    /// Filter to readings stored at or before this time.
    pub fn until(mut self, time: NaiveDateTime) -> Self {
        self.until = Some(time);
        self
    }

    /// Limit the maximum number of results returned.
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Skip the first N results. Only applied together with a limit.
    pub fn offset(mut self, offset: u32) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Order results oldest first.
    pub fn oldest_first(mut self) -> Self {
        self.newest_first = false;
        self
    }

    /// Build the SQL WHERE clause and parameters.
    pub(crate) fn build_where(&self) -> (String, Vec<Box<dyn rusqlite::ToSql>>) {
        let mut conditions = Vec::new();
        let mut params: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(device_id) = self.device_id {
            conditions.push("dev_id = ?");
            params.push(Box::new(device_id));
        }

        // Stored text sorts chronologically, so compare as text
        if let Some(since) = self.since {
            conditions.push("timestamp >= ?");
            params.push(Box::new(format_timestamp(&since)));
        }

        if let Some(until) = self.until {
            conditions.push("timestamp <= ?");
            params.push(Box::new(format_timestamp(&until)));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        (where_clause, params)
    }

    /// Build the full SQL query.
    pub(crate) fn build_sql(&self) -> String {
        let (where_clause, _) = self.build_where();
        let order = if self.newest_first { "DESC" } else { "ASC" };

        let mut sql = format!(
            "SELECT id, dev_id, humidity, temperature, ec, timestamp \
             FROM sensor_data {} ORDER BY id {}",
            where_clause, order
        );

        if let Some(limit) = self.limit {
            sql.push_str(&format!(" LIMIT {}", limit));

            if let Some(offset) = self.offset {
                sql.push_str(&format!(" OFFSET {}", offset));
            }
        }

        sql
    }
}
