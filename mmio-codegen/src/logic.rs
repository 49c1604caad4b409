//! Response logic generator
//!
//! One branch of the run half of the clocked block per direction. A
//! request that passes the address check is answered from the matching
//! ROM; anything else falls back to the BAR default value.
//!
//! Reads play back the captured sequence. Writes store the incoming data
//! into the register's ROM slot instead, so later read-back sees it.

use crate::counter::counter_width;
use crate::fragment::{check_function_name, counter_name, local_address_wire, rom_name};
use crate::fragment::{Fragment, FragmentKind};
use mmio_common::Direction;
use mmio_frontend::Registry;

/// Request strobe and response sink for each direction
struct Channel {
    valid: &'static str,
    target: &'static str,
}

fn channel(direction: Direction) -> Channel {
    match direction {
        Direction::Read => Channel {
            valid: "drd_req_valid",
            target: "rd_rsp_data",
        },
        Direction::Write => Channel {
            valid: "dwr_valid",
            target: "wr_data_out",
        },
    }
}

/// Statement that moves data for one ROM slot
fn transfer(direction: Direction, rom: &str, index: &str, target: &str) -> String {
    match direction {
        Direction::Read => format!("{} <= {}[{}];", target, rom, index),
        Direction::Write => format!("{}[{}] <= dwr_data;", rom, index),
    }
}

/// Response logic for one BAR and direction
pub fn response_logic(registry: &Registry, bar: u8, direction: Direction) -> Fragment {
    let addresses = registry.unique_addresses(bar, direction);
    if addresses.is_empty() {
        return Fragment::directional(FragmentKind::Logic, direction, String::new());
    }

    let (read_default, write_default) = registry.defaults(bar);
    let default = match direction {
        Direction::Read => read_default,
        Direction::Write => write_default,
    };
    let Channel { valid, target } = channel(direction);
    let wire = local_address_wire(direction);

    let mut text = String::new();
    text.push_str(&format!(
        "            if ({} && {}({})) begin\n",
        valid,
        check_function_name(direction),
        wire
    ));
    text.push_str(&format!("                case ({})\n", wire));

    for address in &addresses {
        let rom = rom_name(direction, address);
        let count = registry.count(bar, address, direction);
        if count > 1 {
            let counter = counter_name(direction, address);
            let width = counter_width(count);
            text.push_str(&format!("                    20'h{}: begin\n", address));
            text.push_str(&format!(
                "                        {c} <= ({c} == {w}'d{last}) ? {w}'d0 : {c} + {w}'d1;\n",
                c = counter,
                w = width,
                last = count - 1
            ));
            text.push_str(&format!(
                "                        {}\n",
                transfer(direction, &rom, &counter, target)
            ));
            text.push_str("                    end\n");
        } else {
            text.push_str(&format!(
                "                    20'h{}: {}\n",
                address,
                transfer(direction, &rom, "0", target)
            ));
        }
    }

    text.push_str(&format!("                    default: {} <= 32'h{};\n", target, default));
    text.push_str("                endcase\n");
    text.push_str(&format!("            end else if ({}) begin\n", valid));
    text.push_str(&format!("                {} <= 32'h{};\n", target, default));
    text.push_str("            end\n");

    Fragment::directional(FragmentKind::Logic, direction, text)
}
