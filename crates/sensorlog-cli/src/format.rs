//! Output formatting utilities for text, JSON, and CSV output.

use anyhow::Result;
use owo_colors::OwoColorize;
use sensorlog_store::{DeviceSummary, ReadingRow, StoredReading, format_timestamp};
use tabled::builder::Builder;
use tabled::settings::Style;

/// Formatting options for output.
#[derive(Debug, Clone, Copy, Default)]
pub struct FormatOptions {
    /// Disable colored output.
    pub no_color: bool,
    /// Omit header row in CSV output.
    pub no_header: bool,
}

impl FormatOptions {
    pub fn new(no_color: bool) -> Self {
        Self {
            no_color,
            no_header: false,
        }
    }

    /// Create with no_header option for CSV output.
    pub fn with_no_header(mut self, no_header: bool) -> Self {
        self.no_header = no_header;
        self
    }

    /// Serialize value to pretty JSON with a trailing newline.
    pub fn as_json<T: serde::Serialize>(&self, value: &T) -> Result<String> {
        Ok(serde_json::to_string_pretty(value)? + "\n")
    }

    fn heading(&self, text: &str) -> String {
        if self.no_color {
            text.to_string()
        } else {
            text.bold().to_string()
        }
    }

    fn dimmed(&self, text: &str) -> String {
        if self.no_color {
            text.to_string()
        } else {
            text.dimmed().to_string()
        }
    }
}

fn finish_table(builder: Builder) -> String {
    let mut table = builder.build();
    table.with(Style::rounded());
    table.to_string() + "\n"
}

// ============================================================================
// Readings (with id)
// ============================================================================

#[must_use]
pub fn format_readings_text(readings: &[StoredReading], opts: &FormatOptions) -> String {
    if readings.is_empty() {
        return opts.dimmed("No readings found.") + "\n";
    }

    let mut builder = Builder::default();
    builder.push_record(["ID", "Device", "Humidity", "Temp", "EC", "Timestamp"]);
    for r in readings {
        builder.push_record([
            r.id.to_string(),
            r.device_id.to_string(),
            format!("{:.1}%", r.humidity),
            format!("{:.1}°C", r.temperature),
            format!("{:.2}", r.ec),
            format_timestamp(&r.timestamp),
        ]);
    }
    finish_table(builder)
}

#[must_use]
pub fn format_readings_csv(readings: &[StoredReading], opts: &FormatOptions) -> String {
    let mut output = if opts.no_header {
        String::new()
    } else {
        "id,device_id,humidity,temperature,ec,timestamp\n".to_string()
    };
    for r in readings {
        output.push_str(&format!(
            "{},{},{},{},{},{}\n",
            r.id,
            r.device_id,
            r.humidity,
            r.temperature,
            r.ec,
            format_timestamp(&r.timestamp)
        ));
    }
    output
}

pub fn format_readings_json(readings: &[StoredReading], opts: &FormatOptions) -> Result<String> {
    opts.as_json(&readings)
}

// ============================================================================
// Database rows (no id)
// ============================================================================

#[must_use]
pub fn format_rows_text(rows: &[ReadingRow], opts: &FormatOptions) -> String {
    if rows.is_empty() {
        return opts.dimmed("Database is empty.") + "\n";
    }

    let mut output = opts.heading(&format!("{} readings", rows.len())) + "\n";
    let mut builder = Builder::default();
    builder.push_record(["Device", "Humidity", "Temp", "EC", "Timestamp"]);
    for r in rows {
        builder.push_record([
            r.device_id.to_string(),
            format!("{:.1}%", r.humidity),
            format!("{:.1}°C", r.temperature),
            format!("{:.2}", r.ec),
            format_timestamp(&r.timestamp),
        ]);
    }
    output.push_str(&finish_table(builder));
    output
}

#[must_use]
pub fn format_rows_csv(rows: &[ReadingRow], opts: &FormatOptions) -> String {
    let mut output = if opts.no_header {
        String::new()
    } else {
        "device_id,humidity,temperature,ec,timestamp\n".to_string()
    };
    for r in rows {
        output.push_str(&format!(
            "{},{},{},{},{}\n",
            r.device_id,
            r.humidity,
            r.temperature,
            r.ec,
            format_timestamp(&r.timestamp)
        ));
    }
    output
}

pub fn format_rows_json(rows: &[ReadingRow], opts: &FormatOptions) -> Result<String> {
    opts.as_json(&rows)
}

// ============================================================================
// Devices
// ============================================================================

#[must_use]
pub fn format_devices_text(devices: &[DeviceSummary], opts: &FormatOptions) -> String {
    if devices.is_empty() {
        return opts.dimmed("No devices seen yet. Run 'sensorlog ingest' to collect readings.")
            + "\n";
    }

    let mut builder = Builder::default();
    builder.push_record(["Device", "Readings", "First seen", "Last seen"]);
    for d in devices {
        builder.push_record([
            d.device_id.to_string(),
            d.readings.to_string(),
            format_timestamp(&d.first_seen),
            format_timestamp(&d.last_seen),
        ]);
    }
    finish_table(builder)
}

#[must_use]
pub fn format_devices_csv(devices: &[DeviceSummary], opts: &FormatOptions) -> String {
    let mut output = if opts.no_header {
        String::new()
    } else {
        "device_id,readings,first_seen,last_seen\n".to_string()
    };
    for d in devices {
        output.push_str(&format!(
            "{},{},{},{}\n",
            d.device_id,
            d.readings,
            format_timestamp(&d.first_seen),
            format_timestamp(&d.last_seen)
        ));
    }
    output
}

pub fn format_devices_json(devices: &[DeviceSummary], opts: &FormatOptions) -> Result<String> {
    opts.as_json(&devices)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sample() -> StoredReading {
        StoredReading {
            id: 7,
            device_id: 18,
            humidity: 55.2,
            temperature: 23.1,
            ec: 1.8,
            timestamp: NaiveDate::from_ymd_opt(2024, 3, 1)
                .unwrap()
                .and_hms_opt(12, 30, 5)
                .unwrap(),
        }
    }

    #[test]
    fn test_readings_csv() {
        let csv = format_readings_csv(&[sample()], &FormatOptions::default());
        assert_eq!(
            csv,
            "id,device_id,humidity,temperature,ec,timestamp\n7,18,55.2,23.1,1.8,2024-03-01 12:30:05\n"
        );
    }

    #[test]
    fn test_rows_csv_without_header() {
        let opts = FormatOptions::default().with_no_header(true);
        let csv = format_rows_csv(&[sample().to_row()], &opts);
        assert_eq!(csv, "18,55.2,23.1,1.8,2024-03-01 12:30:05\n");
    }

    #[test]
    fn test_readings_json_keeps_timestamp_text() {
        let json = format_readings_json(&[sample()], &FormatOptions::default()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["device_id"], 18);
        assert_eq!(value[0]["timestamp"], "2024-03-01 12:30:05");
    }

    #[test]
    fn test_readings_text_table() {
        let text = format_readings_text(&[sample()], &FormatOptions::new(true));
        assert!(text.contains("55.2%"));
        assert!(text.contains("23.1°C"));
        assert!(text.contains("2024-03-01 12:30:05"));
    }

    #[test]
    fn test_empty_listings() {
        let opts = FormatOptions::new(true);
        assert_eq!(format_readings_text(&[], &opts), "No readings found.\n");
        assert_eq!(format_rows_text(&[], &opts), "Database is empty.\n");
        assert!(format_devices_text(&[], &opts).starts_with("No devices seen yet."));
    }

    #[test]
    fn test_devices_csv() {
        let ts = sample().timestamp;
        let devices = [DeviceSummary {
            device_id: 42,
            readings: 3,
            first_seen: ts,
            last_seen: ts,
        }];
        let csv = format_devices_csv(&devices, &FormatOptions::default());
        assert!(csv.ends_with("42,3,2024-03-01 12:30:05,2024-03-01 12:30:05\n"));
    }
}
