//! Parse command - show how a raw serial line would be handled.

use std::path::PathBuf;

use anyhow::Result;
use owo_colors::OwoColorize;
use sensorlog_types::{Reading, try_parse_line};
use serde::Serialize;

use crate::cli::OutputFormat;
use crate::util::write_output;

/// Result of running a line through the parser and the field conversion.
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ParseReport {
    /// The line is not a data line; it would be skipped.
    Skipped { reason: String },
    /// A data line with a field that does not convert; it would be rejected.
    Rejected { tokens: Vec<String>, reason: String },
    /// The line would be stored.
    Accepted { tokens: Vec<String>, reading: Reading },
}

/// Classify `line` without touching any store.
pub fn inspect_line(line: &str) -> ParseReport {
    let fields = match try_parse_line(line.trim()) {
        Ok(fields) => fields,
        Err(e) => {
            return ParseReport::Skipped {
                reason: e.to_string(),
            };
        }
    };

    let tokens: Vec<String> = fields.tokens().iter().map(|t| t.to_string()).collect();
    match Reading::try_from(&fields) {
        Ok(reading) => ParseReport::Accepted { tokens, reading },
        Err(e) => ParseReport::Rejected {
            tokens,
            reason: e.to_string(),
        },
    }
}

/// Execute the parse command.
pub fn cmd_parse(
    line: &str,
    format: OutputFormat,
    output: Option<&PathBuf>,
    no_color: bool,
) -> Result<()> {
    let report = inspect_line(line);
    let content = match format {
        OutputFormat::Json => serde_json::to_string_pretty(&report)? + "\n",
        OutputFormat::Text | OutputFormat::Csv => format_report_text(&report, no_color),
    };
    write_output(output, &content)
}

fn format_report_text(report: &ParseReport, no_color: bool) -> String {
    let label = |text: &str, ok: bool| {
        if no_color {
            text.to_string()
        } else if ok {
            text.green().to_string()
        } else {
            text.yellow().to_string()
        }
    };

    match report {
        ParseReport::Skipped { reason } => {
            format!("{} not a data line ({})\n", label("skipped:", false), reason)
        }
        ParseReport::Rejected { tokens, reason } => format!(
            "{} tokens {:?}, {}\n",
            label("rejected:", false),
            tokens,
            reason
        ),
        ParseReport::Accepted { tokens, reading } => format!(
            "{} tokens {:?}\n  {}\n",
            label("accepted:", true),
            tokens,
            reading
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inspect_accepts_and_drops_extra_tokens() {
        match inspect_line("Reading: 18 55.2 23.1 1.8 extra") {
            ParseReport::Accepted { tokens, reading } => {
                assert_eq!(tokens, vec!["18", "55.2", "23.1", "1.8"]);
                assert_eq!(reading.device_id, 18);
            }
            other => panic!("expected accepted, got {:?}", other),
        }
    }

    #[test]
    fn test_inspect_skips_non_data_line() {
        assert!(matches!(
            inspect_line("no colon here"),
            ParseReport::Skipped { .. }
        ));
    }

    #[test]
    fn test_inspect_rejects_bad_field() {
        match inspect_line("Reading: 18 abc 23.1 1.8") {
            ParseReport::Rejected { reason, .. } => assert!(reason.contains("humidity")),
            other => panic!("expected rejected, got {:?}", other),
        }
    }

    #[test]
    fn test_report_json_shape() {
        let json = serde_json::to_value(inspect_line("Reading: 18 55.2 23.1 1.8")).unwrap();
        assert_eq!(json["status"], "accepted");
        assert_eq!(json["reading"]["humidity"], 55.2);
    }

    #[test]
    fn test_report_text_plain() {
        let text = format_report_text(&inspect_line("hello"), true);
        assert!(text.starts_with("skipped: not a data line"));
    }
}
