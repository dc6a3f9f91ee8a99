//! Shared types for the sensorlog serial data logger.
//!
//! This crate holds everything that does not depend on storage or I/O:
//!
//! - [`Reading`]: one humidity / temperature / EC sample from a device
//! - [`parse_line`] / [`try_parse_line`]: the serial line parser
//! - [`ParseError`] and [`ValidationError`] describing rejected input
//!
//! # Example
//!
//! ```
//! use sensorlog_types::{Reading, parse_line};
//!
//! let fields = parse_line("Reading: 18 55.2 23.1 1.8").expect("data line");
//! let reading = Reading::try_from(&fields).expect("numeric fields");
//! assert_eq!(reading.device_id, 18);
//! ```

pub mod error;
pub mod parse;
pub mod types;

pub use error::{Field, ParseError, ParseResult, ValidationError};
pub use parse::{DELIMITER, FIELD_COUNT, RawFields, parse_line, try_parse_line};
pub use types::Reading;
