//! Address check generator
//!
//! Emits `read_addr_check` / `write_addr_check`, a case-based predicate
//! that is true for every register observed in that direction. Addresses
//! are listed eight per line.

use crate::fragment::{check_function_name, Fragment, FragmentKind};
use mmio_common::Direction;
use mmio_frontend::Registry;

/// Addresses listed on one case line
pub const ADDRESSES_PER_LINE: usize = 8;

/// Address check function for one BAR and direction
///
/// Returns a blank fragment when the direction has no observations.
pub fn address_check(registry: &Registry, bar: u8, direction: Direction) -> Fragment {
    let addresses = registry.unique_addresses(bar, direction);
    if addresses.is_empty() {
        return Fragment::directional(FragmentKind::AddressCheck, direction, String::new());
    }

    let name = check_function_name(direction);
    let mut text = String::new();
    text.push_str(&format!("    function {};\n", name));
    text.push_str("        input [19:0] addr;\n");
    text.push_str("        begin\n");
    text.push_str("            case (addr)\n");

    let groups: Vec<&[String]> = addresses.chunks(ADDRESSES_PER_LINE).collect();
    for (index, group) in groups.iter().enumerate() {
        let labels: Vec<String> = group.iter().map(|a| format!("20'h{}", a)).collect();
        let terminator = if index + 1 < groups.len() { "," } else { ":" };
        text.push_str(&format!("                {}{}\n", labels.join(", "), terminator));
    }

    text.push_str(&format!("                    {} = 1'b1;\n", name));
    text.push_str(&format!("                default: {} = 1'b0;\n", name));
    text.push_str("            endcase\n");
    text.push_str("        end\n");
    text.push_str("    endfunction\n");

    Fragment::directional(FragmentKind::AddressCheck, direction, text)
}
