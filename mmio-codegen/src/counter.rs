//! Sequence counter generator
//!
//! A register with more than one observed value needs a counter to index
//! its ROM. Single-value registers always read slot 0 and get no counter.

use crate::fragment::{counter_name, Fragment, FragmentKind};
use mmio_common::{bit_length, Direction};
use mmio_frontend::Registry;

/// Counter width in bits for a ROM of `count` entries
pub fn counter_width(count: usize) -> u32 {
    bit_length(count as u64).max(1)
}

/// Addresses that need a counter, ascending, with their observation count
pub fn counted_addresses(registry: &Registry, bar: u8, direction: Direction) -> Vec<(String, usize)> {
    registry
        .unique_addresses(bar, direction)
        .into_iter()
        .map(|address| {
            let count = registry.count(bar, &address, direction);
            (address, count)
        })
        .filter(|(_, count)| *count > 1)
        .collect()
}

/// Counter register declarations
pub fn counter_declarations(registry: &Registry, bar: u8, direction: Direction) -> Fragment {
    let mut text = String::new();
    for (address, count) in counted_addresses(registry, bar, direction) {
        text.push_str(&format!(
            "    bit [{}:0] {};\n",
            counter_width(count) - 1,
            counter_name(direction, &address)
        ));
    }
    Fragment::directional(FragmentKind::Counters, direction, text)
}

/// Synchronous reset of every counter to zero
pub fn counter_resets(registry: &Registry, bar: u8, direction: Direction) -> Fragment {
    let mut text = String::new();
    for (address, _) in counted_addresses(registry, bar, direction) {
        text.push_str(&format!("            {} <= '0;\n", counter_name(direction, &address)));
    }
    Fragment::directional(FragmentKind::ResetCounters, direction, text)
}
