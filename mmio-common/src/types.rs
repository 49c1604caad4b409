//! Common types used throughout the generator
//!
//! This module defines the record types that flow between the trace
//! frontend and the Verilog code generator, plus the small enums used
//! to select directions and BARs.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Highest BAR index a PCI function can expose
pub const MAX_BAR: u8 = 9;

/// Number of hex digits kept for a register address (20-bit BAR window)
pub const ADDRESS_DIGITS: usize = 5;

/// Number of hex digits in a register value (one dword)
pub const VALUE_DIGITS: usize = 8;

/// Canonical all-zero register value
pub const ZERO_VALUE: &str = "00000000";

/// Bus access direction of a trace record
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Direction {
    #[serde(rename = "R")]
    Read,
    #[serde(rename = "W")]
    Write,
}

impl Direction {
    /// Both directions, read first
    pub const ALL: [Direction; 2] = [Direction::Read, Direction::Write];

    /// Single-letter tag used in the trace format and in generated names
    pub fn tag(&self) -> &'static str {
        match self {
            Direction::Read => "R",
            Direction::Write => "W",
        }
    }

    /// Lowercase word, used for generated function and signal names
    pub fn word(&self) -> &'static str {
        match self {
            Direction::Read => "read",
            Direction::Write => "write",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "R" => Ok(Direction::Read),
            "W" => Ok(Direction::Write),
            other => Err(format!("invalid operation '{}', expected R or W", other)),
        }
    }
}

/// Which directions a build should emit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OperationFilter {
    #[serde(rename = "R")]
    Read,
    #[serde(rename = "W")]
    Write,
    #[default]
    #[serde(rename = "B")]
    Both,
}

impl OperationFilter {
    /// Check whether a direction passes this filter
    pub fn includes(&self, direction: Direction) -> bool {
        match self {
            OperationFilter::Read => direction == Direction::Read,
            OperationFilter::Write => direction == Direction::Write,
            OperationFilter::Both => true,
        }
    }

    /// Selected directions in emission order (read before write)
    pub fn directions(&self) -> Vec<Direction> {
        Direction::ALL
            .into_iter()
            .filter(|d| self.includes(*d))
            .collect()
    }
}

impl fmt::Display for OperationFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperationFilter::Read => write!(f, "R"),
            OperationFilter::Write => write!(f, "W"),
            OperationFilter::Both => write!(f, "B"),
        }
    }
}

impl FromStr for OperationFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "R" => Ok(OperationFilter::Read),
            "W" => Ok(OperationFilter::Write),
            "B" => Ok(OperationFilter::Both),
            other => Err(format!("invalid operation filter '{}', expected R, W or B", other)),
        }
    }
}

/// Which BARs a build should emit modules for
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BarSelection {
    /// Every BAR present in the trace, ascending
    #[default]
    All,
    /// An explicit list, emitted in the given order
    Bars(Vec<u8>),
}

/// One tokenized trace line, before byte-lane alignment
///
/// Address and value keep their `0x` prefix exactly as they appeared in
/// the trace; the aligner is responsible for stripping it.
#[derive(Debug, Clone, PartialEq)]
pub struct RawTraceRecord {
    pub direction: Direction,
    pub counter: i64,
    pub timestamp: f64,
    pub bar: i64,
    pub raw_address: String,
    pub raw_value: String,
}

/// A validated, dword-aligned register access
///
/// `address` is always five uppercase hex digits naming a 4-byte aligned
/// register; `value` is eight uppercase hex digits holding the observed
/// bytes at their lane, other lanes zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignedOperation {
    pub direction: Direction,
    pub bar: u8,
    pub address: String,
    pub value: String,
    pub timestamp: f64,
}

impl fmt::Display for AlignedOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} bar{} {}={} @{}",
            self.direction, self.bar, self.address, self.value, self.timestamp
        )
    }
}

/// Check that a string is non-empty and made only of hex digits
pub fn is_hex_digits(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_hexdigit())
}

/// Number of bits needed to represent a hex value, at least 1
///
/// Only the low 32 bits are considered; returns `None` for non-hex input.
pub fn bit_length_of_hex(value: &str) -> Option<u32> {
    if !is_hex_digits(value) {
        return None;
    }
    let start = value.len().saturating_sub(VALUE_DIGITS);
    let word = u32::from_str_radix(&value[start..], 16).ok()?;
    Some(bit_length(word as u64))
}

/// Number of bits needed to represent `n`, at least 1
pub fn bit_length(n: u64) -> u32 {
    (u64::BITS - n.leading_zeros()).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_parse_and_display() {
        assert_eq!("R".parse::<Direction>().unwrap(), Direction::Read);
        assert_eq!("W".parse::<Direction>().unwrap(), Direction::Write);
        assert!("Read".parse::<Direction>().is_err());
        assert_eq!(Direction::Write.to_string(), "W");
        assert_eq!(Direction::Read.word(), "read");
    }

    #[test]
    fn test_operation_filter() {
        assert_eq!("b".parse::<OperationFilter>().unwrap(), OperationFilter::Both);
        assert_eq!(OperationFilter::Both.directions(), vec![Direction::Read, Direction::Write]);
        assert_eq!(OperationFilter::Write.directions(), vec![Direction::Write]);
        assert!(!OperationFilter::Read.includes(Direction::Write));
        assert!("X".parse::<OperationFilter>().is_err());
    }

    #[test]
    fn test_bit_length() {
        assert_eq!(bit_length(0), 1);
        assert_eq!(bit_length(1), 1);
        assert_eq!(bit_length(2), 2);
        assert_eq!(bit_length(0x7a), 7);
        assert_eq!(bit_length(0xFFFF_FFFF), 32);
        assert_eq!(bit_length_of_hex("00000000"), Some(1));
        assert_eq!(bit_length_of_hex("7A000000"), Some(31));
        assert_eq!(bit_length_of_hex("zz"), None);
    }

    #[test]
    fn test_bar_selection_default_is_all() {
        assert_eq!(BarSelection::default(), BarSelection::All);
    }
}
