//! Serial port line source.

use std::io::BufReader;
use std::time::Duration;

use serialport::SerialPort;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::source::{LineSource, next_line};

/// Default serial device.
pub const DEFAULT_PORT: &str = "/dev/ttyUSB0";

/// Default baud rate.
pub const DEFAULT_BAUD_RATE: u32 = 115_200;

/// Default read timeout. Bounds how long a stop request can go unnoticed.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(1);

/// Serial connection parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerialConfig {
    /// Device path, e.g. `/dev/ttyUSB0` or `COM3`.
    pub port: String,
    /// Baud rate.
    pub baud_rate: u32,
    /// Read timeout.
    pub timeout: Duration,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT.to_string(),
            baud_rate: DEFAULT_BAUD_RATE,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl SerialConfig {
    /// Use a different device path.
    pub fn port(mut self, port: impl Into<String>) -> Self {
        self.port = port.into();
        self
    }

    /// Use a different baud rate.
    pub fn baud_rate(mut self, baud_rate: u32) -> Self {
        self.baud_rate = baud_rate;
        self
    }

    /// Use a different read timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Reads lines from a serial port (8 data bits, no parity, 1 stop bit).
///
/// The port is closed when the source is dropped.
pub struct SerialLineSource {
    reader: BufReader<Box<dyn SerialPort>>,
    pending: Vec<u8>,
    port: String,
}

impl SerialLineSource {
    /// Open the port described by `config`.
    pub fn open(config: &SerialConfig) -> Result<Self> {
        info!(
            "Opening serial port {} at {} baud",
            config.port, config.baud_rate
        );

        let port = serialport::new(&config.port, config.baud_rate)
            .timeout(config.timeout)
            .data_bits(serialport::DataBits::Eight)
            .stop_bits(serialport::StopBits::One)
            .parity(serialport::Parity::None)
            .open()
            .map_err(|source| Error::OpenPort {
                port: config.port.clone(),
                source,
            })?;

        Ok(Self {
            reader: BufReader::new(port),
            pending: Vec::new(),
            port: config.port.clone(),
        })
    }
}

impl LineSource for SerialLineSource {
    fn read_line(&mut self) -> Result<Option<String>> {
        next_line(&mut self.reader, &mut self.pending)
    }

    fn describe(&self) -> String {
        format!("serial port {}", self.port)
    }
}

impl Drop for SerialLineSource {
    fn drop(&mut self) {
        debug!("Closing serial port {}", self.port);
    }
}
