//! Observation registry
//!
//! The registry is the single data store of one conversion run. It keeps
//! every accepted operation in trace order and derives from that stream:
//!
//! - the ordered value sequence of each (BAR, direction, address), which
//!   becomes the ROM contents
//! - the maximum bit width seen at each address
//! - the first read and first write value of each BAR, used as defaults
//!
//! All derived data is a pure function of the ingest order. A registry is
//! created per run and never shared between traces.

use log::trace;
use mmio_common::{
    bit_length_of_hex, is_hex_digits, AlignedOperation, Direction, TraceError, ADDRESS_DIGITS,
    MAX_BAR, VALUE_DIGITS, ZERO_VALUE,
};
use std::collections::{BTreeMap, BTreeSet};

/// First observed read/write value of a BAR
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct BarDefaults {
    read: Option<String>,
    write: Option<String>,
}

/// Per-run store of aligned operations and their derived statistics
#[derive(Debug, Default)]
pub struct Registry {
    operations: Vec<AlignedOperation>,
    /// Values per (bar, direction, address), in trace order
    sequences: BTreeMap<(u8, Direction, String), Vec<String>>,
    bit_widths: BTreeMap<String, u32>,
    defaults: BTreeMap<u8, BarDefaults>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one validated operation
    ///
    /// Fails only if the operation did not come through validation.
    pub fn ingest(&mut self, op: AlignedOperation) -> Result<(), TraceError> {
        Self::check(&op)?;

        let width = bit_length_of_hex(&op.value).unwrap_or(32);
        let entry = self.bit_widths.entry(op.address.clone()).or_insert(0);
        *entry = (*entry).max(width);

        let defaults = self.defaults.entry(op.bar).or_default();
        let slot = match op.direction {
            Direction::Read => &mut defaults.read,
            Direction::Write => &mut defaults.write,
        };
        if slot.is_none() {
            *slot = Some(op.value.clone());
        }

        self.sequences
            .entry((op.bar, op.direction, op.address.clone()))
            .or_default()
            .push(op.value.clone());

        trace!("ingested {}", op);
        self.operations.push(op);
        Ok(())
    }

    fn check(op: &AlignedOperation) -> Result<(), TraceError> {
        if op.bar > MAX_BAR {
            return Err(TraceError::validation(0, format!("BAR number out of range: {}", op.bar)));
        }
        if op.address.len() != ADDRESS_DIGITS || !is_hex_digits(&op.address) {
            return Err(TraceError::validation(0, format!("unnormalized address: {}", op.address)));
        }
        if op.value.len() != VALUE_DIGITS || !is_hex_digits(&op.value) {
            return Err(TraceError::validation(0, format!("unnormalized value: {}", op.value)));
        }
        if !op.timestamp.is_finite() || op.timestamp < 0.0 {
            return Err(TraceError::validation(0, format!("invalid timestamp: {}", op.timestamp)));
        }
        Ok(())
    }

    /// All operations in trace order
    pub fn operations(&self) -> &[AlignedOperation] {
        &self.operations
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Values observed at one register, in trace order, duplicates kept
    pub fn values_for(&self, bar: u8, address: &str, direction: Direction) -> &[String] {
        self.sequences
            .get(&(bar, direction, address.to_string()))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Number of observations at one register
    pub fn count(&self, bar: u8, address: &str, direction: Direction) -> usize {
        self.values_for(bar, address, direction).len()
    }

    /// Distinct addresses seen for a BAR and direction, ascending
    pub fn unique_addresses(&self, bar: u8, direction: Direction) -> Vec<String> {
        self.sequences
            .keys()
            .filter(|(b, d, _)| *b == bar && *d == direction)
            .map(|(_, _, address)| address.clone())
            .collect()
    }

    /// Maximum bit width of any value seen at `address`, 0 if unseen
    pub fn bit_width(&self, address: &str) -> u32 {
        self.bit_widths.get(address).copied().unwrap_or(0)
    }

    /// First (read, write) value seen for a BAR, zero when absent
    pub fn defaults(&self, bar: u8) -> (String, String) {
        let defaults = self.defaults.get(&bar).cloned().unwrap_or_default();
        (
            defaults.read.unwrap_or_else(|| ZERO_VALUE.to_string()),
            defaults.write.unwrap_or_else(|| ZERO_VALUE.to_string()),
        )
    }

    /// BARs with at least one observation, ascending
    pub fn bars(&self) -> Vec<u8> {
        self.sequences
            .keys()
            .map(|(bar, _, _)| *bar)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn has_data(&self, bar: u8) -> bool {
        self.defaults.contains_key(&bar)
    }

    /// Whether a BAR has observations in the given direction
    pub fn has_direction(&self, bar: u8, direction: Direction) -> bool {
        self.sequences
            .keys()
            .any(|(b, d, _)| *b == bar && *d == direction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn op(direction: Direction, bar: u8, address: &str, value: &str) -> AlignedOperation {
        AlignedOperation {
            direction,
            bar,
            address: address.to_string(),
            value: value.to_string(),
            timestamp: 1.0,
        }
    }

    #[test]
    fn test_values_keep_order_and_duplicates() {
        let mut registry = Registry::new();
        registry.ingest(op(Direction::Read, 0, "00100", "00000005")).unwrap();
        registry.ingest(op(Direction::Read, 0, "00200", "00000001")).unwrap();
        registry.ingest(op(Direction::Read, 0, "00100", "00000009")).unwrap();
        registry.ingest(op(Direction::Read, 0, "00100", "00000005")).unwrap();

        assert_eq!(
            registry.values_for(0, "00100", Direction::Read),
            ["00000005", "00000009", "00000005"]
        );
        assert_eq!(registry.count(0, "00100", Direction::Read), 3);
        assert!(registry.values_for(0, "00100", Direction::Write).is_empty());
        assert!(registry.values_for(1, "00100", Direction::Read).is_empty());
        assert_eq!(registry.len(), 4);
    }

    #[test]
    fn test_unique_addresses_sorted() {
        let mut registry = Registry::new();
        for address in ["0A000", "00010", "00FFC", "00010", "00004"] {
            registry.ingest(op(Direction::Write, 2, address, "00000001")).unwrap();
        }
        registry.ingest(op(Direction::Read, 2, "00008", "00000001")).unwrap();

        assert_eq!(
            registry.unique_addresses(2, Direction::Write),
            ["00004", "00010", "00FFC", "0A000"]
        );
        assert_eq!(registry.unique_addresses(2, Direction::Read), ["00008"]);
        assert!(registry.unique_addresses(3, Direction::Read).is_empty());
    }

    #[test]
    fn test_bit_width_is_monotonic() {
        let mut registry = Registry::new();
        assert_eq!(registry.bit_width("00100"), 0);

        registry.ingest(op(Direction::Read, 0, "00100", "00000005")).unwrap();
        assert_eq!(registry.bit_width("00100"), 3);

        registry.ingest(op(Direction::Write, 1, "00100", "00007A00")).unwrap();
        assert_eq!(registry.bit_width("00100"), 15);

        registry.ingest(op(Direction::Read, 0, "00100", "00000001")).unwrap();
        assert_eq!(registry.bit_width("00100"), 15);

        registry.ingest(op(Direction::Read, 0, "00104", "00000000")).unwrap();
        assert_eq!(registry.bit_width("00104"), 1);
    }

    #[test]
    fn test_first_value_wins_for_defaults() {
        let mut registry = Registry::new();
        assert_eq!(
            registry.defaults(0),
            ("00000000".to_string(), "00000000".to_string())
        );

        registry.ingest(op(Direction::Write, 0, "00010", "0000BEEF")).unwrap();
        registry.ingest(op(Direction::Read, 0, "00010", "00000011")).unwrap();
        registry.ingest(op(Direction::Read, 0, "00014", "00000022")).unwrap();
        registry.ingest(op(Direction::Write, 0, "00010", "0000CAFE")).unwrap();

        assert_eq!(
            registry.defaults(0),
            ("00000011".to_string(), "0000BEEF".to_string())
        );
        assert_eq!(
            registry.defaults(4),
            ("00000000".to_string(), "00000000".to_string())
        );
    }

    #[test]
    fn test_missing_direction_default_is_zero() {
        let mut registry = Registry::new();
        registry.ingest(op(Direction::Read, 3, "00010", "00000011")).unwrap();
        assert_eq!(
            registry.defaults(3),
            ("00000011".to_string(), "00000000".to_string())
        );
    }

    #[test]
    fn test_bars_and_presence() {
        let mut registry = Registry::new();
        registry.ingest(op(Direction::Read, 5, "00010", "00000001")).unwrap();
        registry.ingest(op(Direction::Write, 1, "00010", "00000001")).unwrap();

        assert_eq!(registry.bars(), vec![1, 5]);
        assert!(registry.has_data(5));
        assert!(!registry.has_data(0));
        assert!(registry.has_direction(1, Direction::Write));
        assert!(!registry.has_direction(1, Direction::Read));
    }

    #[test]
    fn test_ingest_rejects_unvalidated_data() {
        let mut registry = Registry::new();
        assert!(registry.ingest(op(Direction::Read, 10, "00010", "00000001")).is_err());
        assert!(registry.ingest(op(Direction::Read, 0, "0x10", "00000001")).is_err());
        assert!(registry.ingest(op(Direction::Read, 0, "00010", "1")).is_err());

        for timestamp in [f64::INFINITY, f64::NAN, -1.0] {
            let mut bad = op(Direction::Read, 0, "00010", "00000001");
            bad.timestamp = timestamp;
            assert!(registry.ingest(bad).is_err(), "timestamp {}", timestamp);
        }
        assert!(registry.is_empty());
    }
}
