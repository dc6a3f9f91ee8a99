//! Data models for stored data.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use sensorlog_types::Reading;

/// Text layout of the `timestamp` column. Sorts lexicographically.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Format a timestamp the way it is stored.
pub fn format_timestamp(ts: &NaiveDateTime) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

/// Parse a stored timestamp.
pub fn parse_timestamp(s: &str) -> Result<NaiveDateTime, chrono::ParseError> {
    NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT)
}

/// Serde adapter keeping the stored text layout in JSON output.
pub(crate) mod timestamp_text {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(ts: &NaiveDateTime, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&super::format_timestamp(ts))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDateTime, D::Error> {
        let text = String::deserialize(d)?;
        super::parse_timestamp(&text).map_err(serde::de::Error::custom)
    }
}

/// A reading stored in the database.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredReading {
    /// Surrogate key assigned on insert.
    pub id: i64,
    /// Device identifier.
    pub device_id: i64,
    /// Humidity percentage.
    pub humidity: f64,
    /// Temperature in Celsius.
    pub temperature: f64,
    /// Electrical conductivity in µS/cm.
    pub ec: f64,
    /// When the reading was stored (local time, whole seconds).
    #[serde(with = "timestamp_text")]
    pub timestamp: NaiveDateTime,
}

impl StoredReading {
    /// The measured values without storage metadata.
    pub fn reading(&self) -> Reading {
        Reading {
            device_id: self.device_id,
            humidity: self.humidity,
            temperature: self.temperature,
            ec: self.ec,
        }
    }

    /// Drop the surrogate key.
    pub fn to_row(&self) -> ReadingRow {
        ReadingRow {
            device_id: self.device_id,
            humidity: self.humidity,
            temperature: self.temperature,
            ec: self.ec,
            timestamp: self.timestamp,
        }
    }
}

/// The non-key columns of a stored reading, as shown in bulk listings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadingRow {
    pub device_id: i64,
    pub humidity: f64,
    pub temperature: f64,
    pub ec: f64,
    #[serde(with = "timestamp_text")]
    pub timestamp: NaiveDateTime,
}

/// Aggregate information about one device, derived from its readings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceSummary {
    /// Device identifier.
    pub device_id: i64,
    /// Number of stored readings.
    pub readings: u64,
    /// Timestamp of the oldest stored reading.
    #[serde(with = "timestamp_text")]
    pub first_seen: NaiveDateTime,
    /// Timestamp of the newest stored reading.
    #[serde(with = "timestamp_text")]
    pub last_seen: NaiveDateTime,
}
