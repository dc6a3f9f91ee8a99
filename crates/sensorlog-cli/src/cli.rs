//! CLI argument definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Output format for listing commands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Csv,
}

/// Serial connection overrides
#[derive(Debug, Clone, Default, Args)]
pub struct SerialArgs {
    /// Serial device path, or use SENSORLOG_PORT env var
    #[arg(short, long, global = true, env = "SENSORLOG_PORT")]
    pub port: Option<String>,

    /// Baud rate
    #[arg(short, long, global = true)]
    pub baud: Option<u32>,

    /// Read lines from a capture file instead of the serial port
    #[arg(long, global = true, value_name = "FILE")]
    pub replay: Option<PathBuf>,
}

/// Reusable output format arguments
#[derive(Debug, Clone, Args)]
pub struct OutputArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Omit header row in CSV output (useful for appending)
    #[arg(long)]
    pub no_header: bool,
}

#[derive(Parser)]
#[command(name = "sensorlog")]
#[command(author, version, about = "Serial sensor logger with a terminal dashboard", long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Database file, or use SENSORLOG_DB env var
    #[arg(long, global = true, env = "SENSORLOG_DB", value_name = "PATH")]
    pub db: Option<PathBuf>,

    /// Write output to file instead of stdout
    #[arg(short, long, global = true)]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub serial: SerialArgs,

    /// Defaults to `dashboard` when omitted
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Read the serial port and show live charts and tables
    #[cfg(feature = "tui")]
    Dashboard,

    /// Read the serial port and store readings until interrupted
    Ingest,

    /// Show the most recent readings for a device, oldest first
    Last {
        /// Device id
        #[arg(short, long)]
        device: i64,

        /// Number of readings (defaults to the dashboard window)
        #[arg(short = 'n', long)]
        count: Option<u32>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// List devices seen in stored readings
    Devices {
        #[command(flatten)]
        output: OutputArgs,
    },

    /// List every stored reading
    Dump {
        /// Oldest readings first (default is newest first)
        #[arg(long)]
        oldest_first: bool,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Export readings to a CSV file
    Export {
        /// Only export this device
        #[arg(short, long)]
        device: Option<i64>,

        /// Only readings stored at or after this time (YYYY-MM-DD or YYYY-MM-DD HH:MM:SS)
        #[arg(long)]
        since: Option<String>,

        /// Only readings stored at or before this time
        #[arg(long)]
        until: Option<String>,
    },

    /// Delete all stored readings and restart ids at 1
    Clear,

    /// Check how a serial line would be interpreted
    Parse {
        /// The raw line, e.g. "Reading: 18 55.2 23.1 1.8"
        line: String,

        /// Output format (csv prints the same as text)
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Show or create the configuration file
    Config {
        /// Write a config file with the current settings
        #[arg(long)]
        init: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_no_subcommand_is_allowed() {
        let cli = Cli::try_parse_from(["sensorlog"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_last_args() {
        let cli = Cli::try_parse_from(["sensorlog", "last", "--device", "18", "-n", "5"]).unwrap();
        match cli.command {
            Some(Commands::Last { device, count, .. }) => {
                assert_eq!(device, 18);
                assert_eq!(count, Some(5));
            }
            _ => panic!("expected last command"),
        }
    }

    #[test]
    fn test_serial_flags_are_global() {
        let cli = Cli::try_parse_from(["sensorlog", "--port", "/dev/ttyACM0", "ingest", "-b", "9600"])
            .unwrap();
        assert_eq!(cli.serial.port.as_deref(), Some("/dev/ttyACM0"));
        assert_eq!(cli.serial.baud, Some(9600));
        assert!(matches!(cli.command, Some(Commands::Ingest)));
    }

    #[test]
    fn test_global_db_flag() {
        let cli = Cli::try_parse_from(["sensorlog", "devices", "--db", "/tmp/x.db"]).unwrap();
        assert_eq!(cli.db, Some(PathBuf::from("/tmp/x.db")));
    }
}
