//! Error types for line parsing and field validation.

use thiserror::Error;

/// Why a raw serial line was not recognised as a data line.
///
/// These are expected during normal operation (boot banners, debug output
/// from the sensor firmware) and are usually dropped silently.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ParseError {
    /// The line has no `": "` separator.
    #[error("line has no \": \" separator")]
    MissingDelimiter,

    /// Fewer than four tokens follow the separator.
    #[error("expected 4 tokens after separator, found {found}")]
    TooFewTokens { found: usize },
}

/// Why a set of tokens could not be turned into a [`Reading`](crate::Reading).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ValidationError {
    /// Fewer than four tokens were supplied.
    #[error("not enough fields for a reading: expected 4, found {found}")]
    TooFewFields { found: usize },

    /// A token did not convert to the numeric type of its field.
    #[error("invalid {field}: {value:?}")]
    InvalidField { field: Field, value: String },
}

/// Identifies one of the four fields of a reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    DeviceId,
    Humidity,
    Temperature,
    Ec,
}

impl core::fmt::Display for Field {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let name = match self {
            Field::DeviceId => "device id",
            Field::Humidity => "humidity",
            Field::Temperature => "temperature",
            Field::Ec => "ec",
        };
        f.write_str(name)
    }
}

/// Result type alias for parser operations.
pub type ParseResult<T> = std::result::Result<T, ParseError>;
