//! Listing commands - query the local database.

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::cli::{OutputArgs, OutputFormat};
use crate::format::{
    FormatOptions, format_devices_csv, format_devices_json, format_devices_text,
    format_readings_csv, format_readings_json, format_readings_text, format_rows_csv,
    format_rows_json, format_rows_text,
};
use crate::util::{open_store, write_output};

/// Execute the last command: the newest `count` readings of one device,
/// oldest first.
pub fn cmd_last(
    db_path: &Path,
    device: i64,
    count: u32,
    output: &OutputArgs,
    file: Option<&PathBuf>,
    no_color: bool,
) -> Result<()> {
    let store = open_store(db_path)?;
    let readings = store.last_n(device, count)?;

    let opts = FormatOptions::new(no_color).with_no_header(output.no_header);
    let content = match output.format {
        OutputFormat::Text => format_readings_text(&readings, &opts),
        OutputFormat::Json => format_readings_json(&readings, &opts)?,
        OutputFormat::Csv => format_readings_csv(&readings, &opts),
    };
    write_output(file, &content)
}

/// Execute the devices command.
pub fn cmd_devices(
    db_path: &Path,
    output: &OutputArgs,
    file: Option<&PathBuf>,
    no_color: bool,
) -> Result<()> {
    let store = open_store(db_path)?;
    let devices = store.device_summaries()?;

    let opts = FormatOptions::new(no_color).with_no_header(output.no_header);
    let content = match output.format {
        OutputFormat::Text => format_devices_text(&devices, &opts),
        OutputFormat::Json => format_devices_json(&devices, &opts)?,
        OutputFormat::Csv => format_devices_csv(&devices, &opts),
    };
    write_output(file, &content)
}

/// Execute the dump command: every stored row, newest first unless
/// `oldest_first`.
pub fn cmd_dump(
    db_path: &Path,
    oldest_first: bool,
    output: &OutputArgs,
    file: Option<&PathBuf>,
    no_color: bool,
) -> Result<()> {
    let store = open_store(db_path)?;
    let mut rows = store.all_rows()?;
    if oldest_first {
        rows.reverse();
    }

    let opts = FormatOptions::new(no_color).with_no_header(output.no_header);
    let content = match output.format {
        OutputFormat::Text => format_rows_text(&rows, &opts),
        OutputFormat::Json => format_rows_json(&rows, &opts)?,
        OutputFormat::Csv => format_rows_csv(&rows, &opts),
    };
    write_output(file, &content)
}
