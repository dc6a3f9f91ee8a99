//! Configuration file management.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use sensorlog_core::{DEFAULT_BAUD_RATE, DEFAULT_PORT, DEFAULT_TIMEOUT, SerialConfig};
use serde::{Deserialize, Serialize};

use crate::cli::SerialArgs;

/// Configuration file structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Database file (defaults to the platform data directory)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database: Option<PathBuf>,

    /// Serial connection settings
    #[serde(default)]
    pub serial: SerialSection,

    /// Dashboard settings
    #[serde(default)]
    pub dashboard: DashboardConfig,
}

/// `[serial]` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SerialSection {
    #[serde(default = "default_port")]
    pub port: String,

    #[serde(default = "default_baud_rate")]
    pub baud_rate: u32,

    /// Read timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_port() -> String {
    DEFAULT_PORT.to_string()
}

fn default_baud_rate() -> u32 {
    DEFAULT_BAUD_RATE
}

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT.as_millis() as u64
}

impl Default for SerialSection {
    fn default() -> Self {
        Self {
            port: default_port(),
            baud_rate: default_baud_rate(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl SerialSection {
    /// Read timeout, at least 50 ms. A zero timeout makes every read
    /// return immediately.
    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms.max(50))
    }
}

/// `[dashboard]` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Readings per device shown in charts and the by-device table
    #[serde(default = "default_window")]
    pub window: u32,

    /// Redraw interval in milliseconds
    #[serde(default = "default_refresh_ms")]
    pub refresh_ms: u64,
}

fn default_window() -> u32 {
    15
}

fn default_refresh_ms() -> u64 {
    1000
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            window: default_window(),
            refresh_ms: default_refresh_ms(),
        }
    }
}

impl DashboardConfig {
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.refresh_ms.max(50))
    }
}

impl Config {
    /// Get the config file path
    pub fn path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("sensorlog")
            .join("config.toml")
    }

    /// Load config from file, or return default if not found
    pub fn load() -> Self {
        Self::load_from(&Self::path())
    }

    /// Load config from `path`. A missing or unreadable file yields the
    /// defaults, with a warning for the latter.
    pub fn load_from(path: &Path) -> Self {
        if path.exists() {
            match fs::read_to_string(path) {
                Ok(content) => match toml::from_str(&content) {
                    Ok(config) => return config,
                    Err(e) => {
                        eprintln!("Warning: Failed to parse config: {}", e);
                    }
                },
                Err(e) => {
                    eprintln!("Warning: Failed to read config: {}", e);
                }
            }
        }
        Self::default()
    }

    /// Save config to file
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, content)
            .with_context(|| format!("Failed to write config: {}", path.display()))?;
        Ok(())
    }
}

/// Resolve the database path from flag/env, config, or the platform default.
///
/// The `--db` flag and `SENSORLOG_DB` arrive together through clap.
pub fn resolve_db_path(arg: Option<PathBuf>, config: &Config) -> PathBuf {
    arg.or_else(|| config.database.clone())
        .unwrap_or_else(sensorlog_store::default_db_path)
}

/// Merge serial flags over the `[serial]` table.
pub fn resolve_serial(args: &SerialArgs, config: &Config) -> SerialConfig {
    let section = &config.serial;
    SerialConfig::default()
        .port(args.port.clone().unwrap_or_else(|| section.port.clone()))
        .baud_rate(args.baud.unwrap_or(section.baud_rate))
        .timeout(section.read_timeout())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.serial.port, "/dev/ttyUSB0");
        assert_eq!(config.serial.baud_rate, 115_200);
        assert_eq!(config.serial.timeout_ms, 1000);
        assert_eq!(config.dashboard.window, 15);
        assert_eq!(config.dashboard.refresh_ms, 1000);
        assert!(config.database.is_none());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: Config = toml::from_str(
            r#"
            [serial]
            port = "/dev/ttyACM0"
            "#,
        )
        .unwrap();
        assert_eq!(config.serial.port, "/dev/ttyACM0");
        assert_eq!(config.serial.baud_rate, 115_200);
        assert_eq!(config.dashboard, DashboardConfig::default());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.database = Some(PathBuf::from("/var/lib/sensorlog/data.db"));
        config.dashboard.window = 30;
        config.save_to(&path).unwrap();

        assert_eq!(Config::load_from(&path), config);
    }

    #[test]
    fn test_invalid_file_falls_back_to_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "serial = 3").unwrap();

        assert_eq!(Config::load_from(&path), Config::default());
    }

    #[test]
    fn test_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(
            Config::load_from(&dir.path().join("absent.toml")),
            Config::default()
        );
    }

    #[test]
    fn test_resolve_db_path_prefers_arg() {
        let config = Config {
            database: Some(PathBuf::from("from-config.db")),
            ..Default::default()
        };
        assert_eq!(
            resolve_db_path(Some(PathBuf::from("from-arg.db")), &config),
            PathBuf::from("from-arg.db")
        );
        assert_eq!(
            resolve_db_path(None, &config),
            PathBuf::from("from-config.db")
        );
    }

    #[test]
    fn test_resolve_serial_merges_flags() {
        let mut config = Config::default();
        config.serial.port = "/dev/ttyACM0".to_string();
        config.serial.timeout_ms = 250;

        let args = SerialArgs {
            baud: Some(9600),
            ..Default::default()
        };
        let serial = resolve_serial(&args, &config);
        assert_eq!(serial.port, "/dev/ttyACM0");
        assert_eq!(serial.baud_rate, 9600);
        assert_eq!(serial.timeout, Duration::from_millis(250));
    }

    #[test]
    fn test_zero_timeout_is_clamped() {
        let mut config = Config::default();
        config.serial.timeout_ms = 0;

        let serial = resolve_serial(&SerialArgs::default(), &config);
        assert_eq!(serial.timeout, Duration::from_millis(50));
    }
}
