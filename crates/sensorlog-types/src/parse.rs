//! Serial line parser.
//!
//! Sensor firmware prints one reading per line in the form
//!
//! ```text
//! <prefix>: <device id> <humidity> <temperature> <ec> [anything else]
//! ```
//!
//! The parser only locates the four payload tokens. It performs no numeric
//! conversion; that happens in [`Reading::from_tokens`](crate::Reading::from_tokens)
//! so that a line with a garbled value can be told apart from a line that is
//! not a data line at all.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{ParseError, ParseResult};

/// Separator between the line prefix and the payload.
pub const DELIMITER: &str = ": ";

/// Number of payload tokens that make up a reading.
pub const FIELD_COUNT: usize = 4;

/// The four payload tokens of a data line, verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RawFields {
    pub device_id: String,
    pub humidity: String,
    pub temperature: String,
    pub ec: String,
}

impl RawFields {
    /// The tokens in wire order: device id, humidity, temperature, ec.
    #[must_use]
    pub fn tokens(&self) -> [&str; FIELD_COUNT] {
        [
            &self.device_id,
            &self.humidity,
            &self.temperature,
            &self.ec,
        ]
    }
}

/// Parse one line, reporting why it was rejected.
///
/// The line is split once on the first `": "`. The remainder is split on
/// single spaces, so runs of spaces produce empty tokens which still count
/// toward the four. Tokens past the fourth are ignored.
///
/// # Examples
///
/// ```
/// use sensorlog_types::{try_parse_line, ParseError};
///
/// let fields = try_parse_line("Reading: 18 55.2 23.1 1.8 extra").unwrap();
/// assert_eq!(fields.tokens(), ["18", "55.2", "23.1", "1.8"]);
///
/// assert_eq!(try_parse_line("no colon here"), Err(ParseError::MissingDelimiter));
/// ```
pub fn try_parse_line(line: &str) -> ParseResult<RawFields> {
    let (_, payload) = line
        .split_once(DELIMITER)
        .ok_or(ParseError::MissingDelimiter)?;

    let mut tokens = payload.split(' ');
    let mut next = |found: usize| {
        tokens
            .next()
            .map(str::to_string)
            .ok_or(ParseError::TooFewTokens { found })
    };

    Ok(RawFields {
        device_id: next(0)?,
        humidity: next(1)?,
        temperature: next(2)?,
        ec: next(3)?,
    })
}

/// Parse one line, returning `None` for anything that is not a data line.
#[must_use]
pub fn parse_line(line: &str) -> Option<RawFields> {
    try_parse_line(line).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_parse_exact_four_tokens() {
        let fields = parse_line("Reading: 18 55.2 23.1 1.8").unwrap();
        assert_eq!(fields.device_id, "18");
        assert_eq!(fields.humidity, "55.2");
        assert_eq!(fields.temperature, "23.1");
        assert_eq!(fields.ec, "1.8");
    }

    #[test]
    fn test_parse_discards_extra_tokens() {
        let fields = parse_line("Reading: 18 55.2 23.1 1.8 extra").unwrap();
        assert_eq!(fields.tokens(), ["18", "55.2", "23.1", "1.8"]);
    }

    #[test]
    fn test_parse_no_delimiter() {
        assert_eq!(parse_line("no colon here"), None);
        assert_eq!(
            try_parse_line("no colon here"),
            Err(ParseError::MissingDelimiter)
        );
        // A colon without the trailing space is not the delimiter
        assert_eq!(parse_line("Reading:18 55.2 23.1 1.8"), None);
    }

    #[test]
    fn test_parse_too_few_tokens() {
        assert_eq!(
            try_parse_line("Reading: 18 55.2 23.1"),
            Err(ParseError::TooFewTokens { found: 3 })
        );
        assert_eq!(
            try_parse_line("Reading: "),
            Err(ParseError::TooFewTokens { found: 1 })
        );
    }

    #[test]
    fn test_parse_splits_on_first_delimiter_only() {
        let fields = parse_line("a: b: 1 2 3").unwrap();
        assert_eq!(fields.tokens(), ["b:", "1", "2", "3"]);
    }

    #[test]
    fn test_parse_double_space_yields_empty_token() {
        let fields = parse_line("Reading: 18  55.2 23.1").unwrap();
        assert_eq!(fields.tokens(), ["18", "", "55.2", "23.1"]);
    }

    #[test]
    fn test_parse_accepts_garbage_payload() {
        let fields = parse_line("x: a b c d").unwrap();
        assert_eq!(fields.tokens(), ["a", "b", "c", "d"]);
    }

    fn token() -> impl Strategy<Value = String> {
        "[A-Za-z0-9.+-]{1,8}"
    }

    proptest! {
        #[test]
        fn prop_valid_lines_yield_first_four(
            prefix in "[A-Za-z ]{0,12}",
            tokens in prop::collection::vec(token(), 4..8),
        ) {
            let line = format!("{}: {}", prefix, tokens.join(" "));
            let fields = parse_line(&line).unwrap();
            prop_assert_eq!(
                fields.tokens(),
                [tokens[0].as_str(), tokens[1].as_str(), tokens[2].as_str(), tokens[3].as_str()]
            );
        }

        #[test]
        fn prop_lines_without_delimiter_rejected(line in "[^:]*") {
            prop_assert_eq!(parse_line(&line), None);
        }

        #[test]
        fn prop_short_payload_rejected(
            tokens in prop::collection::vec(token(), 0..4),
        ) {
            let line = format!("Reading: {}", tokens.join(" "));
            prop_assert!(parse_line(&line).is_none());
        }
    }
}
