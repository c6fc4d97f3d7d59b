//! Selection ranges as the tools accept them on the command line:
//! comma-separated IDs and inclusive `A..B` spans, e.g. `1..10,4,5`.

use crate::error::{Result, SatchelError};
use regex::Regex;
use std::sync::OnceLock;

static NUMBER_RE: OnceLock<Regex> = OnceLock::new();
static SPAN_RE: OnceLock<Regex> = OnceLock::new();

fn number_re() -> &'static Regex {
    NUMBER_RE.get_or_init(|| Regex::new(r"^\d+$").unwrap())
}

fn span_re() -> &'static Regex {
    SPAN_RE.get_or_init(|| Regex::new(r"^(\d+)\.\.(\d+)$").unwrap())
}

/// Parse a selection into the listed IDs, in the order given.
/// Spans are inclusive on both ends; duplicates are kept; whitespace is
/// ignored wherever it appears.
pub fn parse(input: &str) -> Result<Vec<u32>> {
    let compact: String = input.chars().filter(|c| !c.is_whitespace()).collect();
    let mut ids = Vec::new();

    for piece in compact.split(',') {
        if number_re().is_match(piece) {
            ids.push(parse_u32(piece)?);
        } else if let Some(captures) = span_re().captures(piece) {
            let start = parse_u32(&captures[1])?;
            let end = parse_u32(&captures[2])?;
            if end < start {
                return Err(SatchelError::InvalidRange {
                    input: piece.to_string(),
                    reason: format!("end {end} is smaller than start {start}"),
                });
            }
            ids.extend(start..=end);
        } else {
            return Err(SatchelError::InvalidRange {
                input: piece.to_string(),
                reason: "expected a number or A..B".to_string(),
            });
        }
    }

    Ok(ids)
}

fn parse_u32(digits: &str) -> Result<u32> {
    digits
        .parse()
        .map_err(|_| SatchelError::InvalidRange {
            input: digits.to_string(),
            reason: "number is too large".to_string(),
        })
}
