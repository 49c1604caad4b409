//! Generated Verilog fragments
//!
//! Every generator returns a [`Fragment`] tagged with the kind of code it
//! holds and, for per-direction fragments, the direction it was built for.
//! The coordinator sequences fragments by kind; nothing looks them up by
//! name.

use mmio_common::Direction;
use std::fmt;

/// Kinds of fragment that make up one BAR module, in emission order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FragmentKind {
    Header,            // Port list and address decode wires
    Rom,               // ROM array declarations
    Counters,          // Sequence counter declarations
    AddressCheck,      // read_addr_check / write_addr_check functions
    StateMachineStart, // always_ff and reset branch opening
    ResetCounters,     // Counter reset statements
    RomInit,           // ROM initialization under reset
    StateMachineEnd,   // Request pipelining in the run branch
    Logic,             // Response case statements
    StateMachineClose, // Closes the run branch and always_ff
    ModuleClose,       // endmodule
}

impl FragmentKind {
    /// Whether this kind is emitted once per direction
    pub fn is_directional(&self) -> bool {
        matches!(
            self,
            FragmentKind::Rom
                | FragmentKind::Counters
                | FragmentKind::AddressCheck
                | FragmentKind::ResetCounters
                | FragmentKind::RomInit
                | FragmentKind::Logic
        )
    }
}

impl fmt::Display for FragmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FragmentKind::Header => "header",
            FragmentKind::Rom => "rom",
            FragmentKind::Counters => "counter",
            FragmentKind::AddressCheck => "addr_check",
            FragmentKind::StateMachineStart => "state_machine_start",
            FragmentKind::ResetCounters => "reset_counter",
            FragmentKind::RomInit => "rom_init",
            FragmentKind::StateMachineEnd => "state_machine_end",
            FragmentKind::Logic => "logic",
            FragmentKind::StateMachineClose => "state_machine_close",
            FragmentKind::ModuleClose => "module_close",
        };
        write!(f, "{}", name)
    }
}

/// A piece of generated source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    pub kind: FragmentKind,
    pub direction: Option<Direction>,
    pub text: String,
}

impl Fragment {
    /// Fragment that does not depend on direction
    pub fn fixed(kind: FragmentKind, text: String) -> Self {
        Self {
            kind,
            direction: None,
            text,
        }
    }

    /// Fragment built for one direction
    pub fn directional(kind: FragmentKind, direction: Direction, text: String) -> Self {
        Self {
            kind,
            direction: Some(direction),
            text,
        }
    }

    /// True when the fragment holds only whitespace
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

impl fmt::Display for Fragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}

/// ROM array name for a register, e.g. `R_003FC`
pub fn rom_name(direction: Direction, address: &str) -> String {
    format!("{}_{}", direction.tag(), address)
}

/// Counter register name for a register, e.g. `W_C_003FC`
pub fn counter_name(direction: Direction, address: &str) -> String {
    format!("{}_C_{}", direction.tag(), address)
}

/// Address check function name, e.g. `read_addr_check`
pub fn check_function_name(direction: Direction) -> String {
    format!("{}_addr_check", direction.word())
}

/// Local address wire compared against register addresses
pub fn local_address_wire(direction: Direction) -> String {
    format!("local_{}_addr", direction.word())
}
