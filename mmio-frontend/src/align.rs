//! Byte-lane aligner
//!
//! MMIO traces record single byte and partial dword accesses. The aligner
//! folds such an access back onto the owning 4-byte register: the last
//! address digit is rounded down to `0/4/8/c` and the value is shifted into
//! its byte lane, so that byte-granular accesses to one dword land on the
//! same register.

use mmio_common::{is_hex_digits, TraceError, VALUE_DIGITS};

/// Result of aligning one raw access
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alignment {
    /// Full aligned address digits, without `0x` (not yet truncated)
    pub address: String,
    /// Value shifted into its lane, masked to 32 bits
    pub value: u32,
    /// Shift applied to the raw value, in bits
    pub shift: u32,
}

impl Alignment {
    /// The aligned value as eight uppercase hex digits
    pub fn value_hex(&self) -> String {
        format!("{:08X}", self.value)
    }
}

/// Map an address digit to its dword base digit and byte lane
///
/// Returns `None` if `digit` is not a hex digit.
pub fn lane_for_digit(digit: char) -> Option<(char, u32)> {
    let d = digit.to_digit(16)?;
    let base = char::from_digit(d & !0x3, 16)?;
    Some((base, d & 0x3))
}

/// Align a raw `0x`-prefixed address and value to a dword register
pub fn align(raw_address: &str, raw_value: &str) -> Result<Alignment, TraceError> {
    let address = raw_address.strip_prefix("0x").unwrap_or(raw_address);
    let last = address
        .chars()
        .last()
        .ok_or_else(|| TraceError::malformed(0, format!("invalid address format: {}", raw_address)))?;
    let (base, lane) = lane_for_digit(last)
        .ok_or_else(|| TraceError::malformed(0, format!("invalid address format: {}", raw_address)))?;

    let value = raw_value.strip_prefix("0x").unwrap_or(raw_value);
    if !is_hex_digits(value) {
        return Err(TraceError::malformed(0, format!("invalid hex value: {}", raw_value)));
    }
    // Only the low dword of the raw value can survive the 32-bit mask.
    let low = &value[value.len().saturating_sub(VALUE_DIGITS)..];
    let raw = u32::from_str_radix(low, 16)
        .map_err(|e| TraceError::malformed(0, format!("invalid hex value {}: {}", raw_value, e)))?;

    let shift = lane * 8;
    let shifted = ((raw as u64) << shift) & 0xFFFF_FFFF;

    let mut aligned = address[..address.len() - last.len_utf8()].to_string();
    aligned.push(base);

    Ok(Alignment {
        address: aligned,
        value: shifted as u32,
        shift,
    })
}
