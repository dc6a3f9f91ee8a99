//! Export command - write readings as CSV.

use std::fs::File;
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use chrono::{NaiveDate, NaiveDateTime};
use sensorlog_store::{ReadingQuery, parse_timestamp};

use crate::util::open_store;

/// Filters for the export command.
#[derive(Debug, Default)]
pub struct ExportArgs {
    pub device: Option<i64>,
    pub since: Option<String>,
    pub until: Option<String>,
}

/// Execute the export command.
pub fn cmd_export(
    db_path: &Path,
    args: ExportArgs,
    output: Option<&PathBuf>,
    quiet: bool,
) -> Result<()> {
    let store = open_store(db_path)?;

    let mut query = ReadingQuery::new().oldest_first();
    if let Some(device) = args.device {
        query = query.device(device);
    }
    if let Some(since) = args.since.as_deref() {
        query = query.since(parse_time_arg(since, false)?);
    }
    if let Some(until) = args.until.as_deref() {
        query = query.until(parse_time_arg(until, true)?);
    }

    let count = match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            store.export_csv(BufWriter::new(file), &query)?
        }
        None => store.export_csv(io::stdout().lock(), &query)?,
    };

    if !quiet && let Some(path) = output {
        eprintln!("Exported {} readings to {}", count, path.display());
    }
    Ok(())
}

/// Parse a `--since`/`--until` value. A bare date means the start of that
/// day, or its last second when `end_of_day` is set.
pub fn parse_time_arg(value: &str, end_of_day: bool) -> Result<NaiveDateTime> {
    if let Ok(ts) = parse_timestamp(value) {
        return Ok(ts);
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        let time = if end_of_day {
            date.and_hms_opt(23, 59, 59)
        } else {
            date.and_hms_opt(0, 0, 0)
        };
        if let Some(ts) = time {
            return Ok(ts);
        }
    }
    bail!(
        "Invalid time '{}'. Use YYYY-MM-DD or \"YYYY-MM-DD HH:MM:SS\".",
        value
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_timestamp() {
        let ts = parse_time_arg("2024-03-01 12:30:05", false).unwrap();
        assert_eq!(ts.to_string(), "2024-03-01 12:30:05");
    }

    #[test]
    fn test_parse_bare_date() {
        assert_eq!(
            parse_time_arg("2024-03-01", false).unwrap().to_string(),
            "2024-03-01 00:00:00"
        );
        assert_eq!(
            parse_time_arg("2024-03-01", true).unwrap().to_string(),
            "2024-03-01 23:59:59"
        );
    }

    #[test]
    fn test_parse_invalid_time() {
        let err = parse_time_arg("yesterday", false).unwrap_err();
        assert!(err.to_string().contains("Invalid time"));
    }
}
