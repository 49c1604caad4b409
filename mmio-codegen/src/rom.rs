//! ROM generator
//!
//! Every register observed in a direction gets one ROM holding its values
//! in trace order. Repeated values take separate slots, so the ROM depth is
//! the number of observations and the counter walks it in capture order.

use crate::fragment::{rom_name, Fragment, FragmentKind};
use mmio_common::Direction;
use mmio_frontend::Registry;

/// ROM array declarations for one BAR and direction
pub fn rom_declarations(registry: &Registry, bar: u8, direction: Direction) -> Fragment {
    let mut text = String::new();
    for address in registry.unique_addresses(bar, direction) {
        let depth = registry.count(bar, &address, direction);
        let width = registry.bit_width(&address).max(1);
        text.push_str(&format!(
            "    bit [{}:0] {} [0:{}];\n",
            width - 1,
            rom_name(direction, &address),
            depth - 1
        ));
    }
    Fragment::directional(FragmentKind::Rom, direction, text)
}

/// ROM initialization assignments, placed in the reset branch
pub fn rom_init(registry: &Registry, bar: u8, direction: Direction) -> Fragment {
    let mut text = String::new();
    for address in registry.unique_addresses(bar, direction) {
        let name = rom_name(direction, &address);
        for (index, value) in registry.values_for(bar, &address, direction).iter().enumerate() {
            text.push_str(&format!("            {}[{}] <= 32'h{};\n", name, index, value));
        }
    }
    Fragment::directional(FragmentKind::RomInit, direction, text)
}
