//! Field validation and normalization
//!
//! Every field of an aligned record passes through here before it can
//! reach the registry. Addresses are cut to the 20-bit BAR window and
//! values to one dword, both rendered as uppercase hex.

use crate::align::Alignment;
use mmio_common::{
    is_hex_digits, AlignedOperation, Direction, RawTraceRecord, TraceError, ADDRESS_DIGITS,
    MAX_BAR, VALUE_DIGITS, ZERO_VALUE,
};

/// Parse the direction token of a trace line
pub fn direction(token: &str) -> Result<Direction, TraceError> {
    token
        .parse::<Direction>()
        .map_err(|message| TraceError::validation(0, message))
}

/// Check that a BAR number is within `0..=9`
pub fn bar(value: i64) -> Result<u8, TraceError> {
    if !(0..=MAX_BAR as i64).contains(&value) {
        return Err(TraceError::validation(
            0,
            format!("BAR number out of range: {}", value),
        ));
    }
    Ok(value as u8)
}

/// Keep the last `width` digits of a hex string, zero-padded and uppercased
fn last_digits(digits: &str, width: usize) -> String {
    let tail = &digits[digits.len().saturating_sub(width)..];
    format!("{:0>width$}", tail.to_ascii_uppercase(), width = width)
}

/// Normalize an address to its last five hex digits
///
/// Addresses wider than the 20-bit window lose their high digits, so two
/// addresses that differ only above bit 19 alias to the same register.
pub fn address(raw: &str) -> Result<String, TraceError> {
    let digits = raw.strip_prefix("0x").unwrap_or(raw);
    if !is_hex_digits(digits) {
        return Err(TraceError::validation(
            0,
            format!("invalid address format: {}", raw),
        ));
    }
    Ok(last_digits(digits, ADDRESS_DIGITS))
}

/// Normalize a register value to eight hex digits
///
/// The literal `"0"` is accepted as the canonical zero value.
pub fn value(raw: &str) -> Result<String, TraceError> {
    if raw == "0" {
        return Ok(ZERO_VALUE.to_string());
    }
    let digits = raw.strip_prefix("0x").unwrap_or(raw);
    if !is_hex_digits(digits) {
        return Err(TraceError::validation(
            0,
            format!("invalid register value format: {}", raw),
        ));
    }
    Ok(last_digits(digits, VALUE_DIGITS))
}

/// Reject negative or non-finite timestamps
pub fn timestamp(value: f64) -> Result<f64, TraceError> {
    if !value.is_finite() {
        return Err(TraceError::validation(
            0,
            format!("timestamp is not a finite number: {}", value),
        ));
    }
    if value < 0.0 {
        return Err(TraceError::validation(0, "timestamp cannot be negative"));
    }
    Ok(value)
}

/// Build a validated operation from a raw record and its alignment
pub fn normalize(
    record: &RawTraceRecord,
    alignment: &Alignment,
    line_number: usize,
) -> Result<AlignedOperation, TraceError> {
    let build = || -> Result<AlignedOperation, TraceError> {
        Ok(AlignedOperation {
            direction: record.direction,
            bar: bar(record.bar)?,
            address: address(&alignment.address)?,
            value: value(&alignment.value_hex())?,
            timestamp: timestamp(record.timestamp)?,
        })
    };
    build().map_err(|e| e.at_line(line_number))
}
