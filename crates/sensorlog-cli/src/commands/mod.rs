//! Command implementations for the CLI.

mod clear;
mod export;
mod ingest;
mod parse;
mod readings;

pub use clear::cmd_clear;
pub use export::{ExportArgs, cmd_export, parse_time_arg};
pub use ingest::cmd_ingest;
pub use parse::{ParseReport, cmd_parse, inspect_line};
pub use readings::{cmd_devices, cmd_dump, cmd_last};
