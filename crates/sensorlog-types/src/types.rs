//! Core types for sensor data.

use core::fmt;
use core::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Field, ValidationError};
use crate::parse::{FIELD_COUNT, RawFields};

/// One sensor sample as reported by a device.
///
/// No range checks are applied: any value that parses is accepted.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Reading {
    /// Identifier of the originating sensor unit.
    pub device_id: i64,
    /// Relative humidity in percent.
    pub humidity: f64,
    /// Temperature in degrees Celsius.
    pub temperature: f64,
    /// Electrical conductivity in µS/cm.
    pub ec: f64,
}

impl Reading {
    /// Convert payload tokens into a reading.
    ///
    /// Tokens are taken in wire order (device id, humidity, temperature, ec);
    /// anything past the fourth is ignored. The first token that fails to
    /// convert is reported.
    ///
    /// # Examples
    ///
    /// ```
    /// use sensorlog_types::Reading;
    ///
    /// let reading = Reading::from_tokens(&["18", "55.2", "23.1", "1.8"]).unwrap();
    /// assert_eq!(reading.device_id, 18);
    /// assert!(Reading::from_tokens(&["18", "abc", "23.1", "1.8"]).is_err());
    /// ```
    pub fn from_tokens<S: AsRef<str>>(tokens: &[S]) -> Result<Self, ValidationError> {
        if tokens.len() < FIELD_COUNT {
            return Err(ValidationError::TooFewFields {
                found: tokens.len(),
            });
        }

        Ok(Self {
            device_id: convert(Field::DeviceId, tokens[0].as_ref())?,
            humidity: convert(Field::Humidity, tokens[1].as_ref())?,
            temperature: convert(Field::Temperature, tokens[2].as_ref())?,
            ec: convert(Field::Ec, tokens[3].as_ref())?,
        })
    }
}

fn convert<T: FromStr>(field: Field, value: &str) -> Result<T, ValidationError> {
    value
        .parse()
        .map_err(|_| ValidationError::InvalidField {
            field,
            value: value.to_string(),
        })
}

impl TryFrom<&RawFields> for Reading {
    type Error = ValidationError;

    fn try_from(fields: &RawFields) -> Result<Self, Self::Error> {
        Self::from_tokens(&fields.tokens())
    }
}

impl fmt::Display for Reading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "device {}: {:.1}% {:.1}°C {:.2} µS/cm",
            self.device_id, self.humidity, self.temperature, self.ec
        )
    }
}
