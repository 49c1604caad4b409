//! Trace line parser
//!
//! Tokenizes one MMIO trace line of the form
//!
//! ```text
//! <R|W> <counter> <timestamp> <bar> <0xaddr> <0xvalue> <0xvalue2> <final>
//! ```
//!
//! into a [`RawTraceRecord`]. Lines that do not start with `R` or `W` are
//! reported as [`TraceError::SkippedLine`]; anything else that does not fit
//! the format is a [`TraceError::MalformedLine`].

use crate::validate;
use mmio_common::{is_hex_digits, RawTraceRecord, TraceError};

/// Number of whitespace separated fields in an operation line
pub const FIELD_COUNT: usize = 8;

/// Check whether a line is an operation line at all
pub fn is_operation_line(line: &str) -> bool {
    line.starts_with('R') || line.starts_with('W')
}

/// Check for a `0x`-prefixed hex literal with at least one digit
pub fn is_valid_hex(field: &str) -> bool {
    field
        .strip_prefix("0x")
        .map(is_hex_digits)
        .unwrap_or(false)
}

/// Parse one trace line
///
/// `line_number` is 1-based and only used for error reporting.
pub fn parse_line(line: &str, line_number: usize) -> Result<RawTraceRecord, TraceError> {
    if !is_operation_line(line) {
        return Err(TraceError::SkippedLine);
    }

    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() != FIELD_COUNT {
        return Err(TraceError::malformed(
            line_number,
            format!("expected {} fields, found {}", FIELD_COUNT, fields.len()),
        ));
    }

    for hex in [fields[4], fields[5]] {
        if !is_valid_hex(hex) {
            return Err(TraceError::malformed(
                line_number,
                format!("invalid hex value: {}", hex),
            ));
        }
    }

    let direction = validate::direction(fields[0]).map_err(|e| e.at_line(line_number))?;

    let counter = fields[1].parse::<i64>().map_err(|_| {
        TraceError::malformed(line_number, format!("invalid counter: {}", fields[1]))
    })?;
    let timestamp = fields[2].parse::<f64>().map_err(|_| {
        TraceError::malformed(line_number, format!("invalid timestamp: {}", fields[2]))
    })?;
    let bar = fields[3].parse::<i64>().map_err(|_| {
        TraceError::malformed(line_number, format!("invalid BAR number: {}", fields[3]))
    })?;

    Ok(RawTraceRecord {
        direction,
        counter,
        timestamp,
        bar,
        raw_address: fields[4].to_string(),
        raw_value: fields[5].to_string(),
    })
}
