use std::fs::OpenOptions;
use std::io;
use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use sensorlog_cli::cli::{Cli, Commands};
use sensorlog_cli::commands::{
    ExportArgs, cmd_clear, cmd_devices, cmd_dump, cmd_export, cmd_ingest, cmd_last, cmd_parse,
};
use sensorlog_cli::config::{Config, resolve_db_path, resolve_serial};
use sensorlog_cli::util::write_output;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Handle completions command early (before tracing init)
    if let Some(Commands::Completions { shell }) = cli.command {
        let mut cmd = Cli::command();
        clap_complete::generate(shell, &mut cmd, "sensorlog", &mut io::stdout());
        return Ok(());
    }

    let config = Config::load();
    let db_path = resolve_db_path(cli.db.clone(), &config);

    // The dashboard owns the terminal, so its logs go to a file
    let command = match cli.command {
        Some(command) => command,
        #[cfg(feature = "tui")]
        None => Commands::Dashboard,
        #[cfg(not(feature = "tui"))]
        None => Commands::Ingest,
    };
    #[cfg(feature = "tui")]
    let to_file = matches!(command, Commands::Dashboard);
    #[cfg(not(feature = "tui"))]
    let to_file = false;
    init_tracing(cli.quiet, cli.verbose, to_file.then_some(db_path.as_path()))?;

    let output = cli.output.as_ref();
    match command {
        #[cfg(feature = "tui")]
        Commands::Dashboard => {
            let serial = resolve_serial(&cli.serial, &config);
            sensorlog_cli::tui::run(
                &db_path,
                &serial,
                cli.serial.replay.as_deref(),
                &config.dashboard,
            )?;
        }
        Commands::Ingest => {
            let serial = resolve_serial(&cli.serial, &config);
            cmd_ingest(&db_path, &serial, cli.serial.replay.as_deref(), cli.quiet).await?;
        }
        Commands::Last {
            device,
            count,
            output: format,
        } => {
            let count = count.unwrap_or(config.dashboard.window);
            cmd_last(&db_path, device, count, &format, output, cli.no_color)?;
        }
        Commands::Devices { output: format } => {
            cmd_devices(&db_path, &format, output, cli.no_color)?;
        }
        Commands::Dump {
            oldest_first,
            output: format,
        } => {
            cmd_dump(&db_path, oldest_first, &format, output, cli.no_color)?;
        }
        Commands::Export {
            device,
            since,
            until,
        } => {
            let args = ExportArgs {
                device,
                since,
                until,
            };
            cmd_export(&db_path, args, output, cli.quiet)?;
        }
        Commands::Clear => cmd_clear(&db_path, cli.quiet)?,
        Commands::Parse { line, format } => {
            cmd_parse(&line, format, output, cli.no_color)?;
        }
        Commands::Config { init } => {
            // Show the settings in effect after flags and environment
            let serial = resolve_serial(&cli.serial, &config);
            let mut effective = config;
            effective.database = Some(db_path);
            effective.serial.port = serial.port;
            effective.serial.baud_rate = serial.baud_rate;

            if init {
                effective.save()?;
                if !cli.quiet {
                    eprintln!("Wrote {}", Config::path().display());
                }
            }
            let content =
                toml::to_string_pretty(&effective).context("Failed to serialize config")?;
            write_output(output, &content)?;
        }
        Commands::Completions { .. } => {}
    }

    Ok(())
}

/// Initialize tracing.
///
/// Logs go to stderr, or to `sensorlog.log` next to the database when
/// `log_beside` is set.
fn init_tracing(quiet: bool, verbose: bool, log_beside: Option<&Path>) -> Result<()> {
    // When quiet mode is enabled, suppress info-level logging
    let filter = if quiet {
        EnvFilter::new("warn")
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    match log_beside {
        Some(db_path) => {
            let path = sensorlog_cli::util::log_file_path(db_path);
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create log directory: {}", parent.display())
                })?;
            }
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(io::stderr)
                .init();
        }
    }
    Ok(())
}
