//! Build options and emitter configuration
//!
//! Both structs deserialize from a JSON settings file with every field
//! optional; missing fields take the defaults below.

use mmio_common::{BarSelection, OperationFilter};
use serde::{Deserialize, Serialize};

/// Module header used when none is configured
pub const DEFAULT_MODULE_HEADER: &str = "cool_bar_controller";

/// Which fragments and BARs a build emits
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildOptions {
    pub bars: BarSelection,
    pub operation: OperationFilter,
    pub include_address_checks: bool,
    pub include_counters: bool,
    pub include_logic: bool,
    pub include_state_machines: bool,
    pub include_rom_init: bool,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            bars: BarSelection::All,
            operation: OperationFilter::Both,
            include_address_checks: true,
            include_counters: true,
            include_logic: true,
            include_state_machines: true,
            include_rom_init: true,
        }
    }
}

/// Naming configuration for generated modules
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmitterConfig {
    /// Middle part of `pcileech_bar_impl_<module_header>_<bar>`
    pub module_header: String,
}

impl Default for EmitterConfig {
    fn default() -> Self {
        Self {
            module_header: DEFAULT_MODULE_HEADER.to_string(),
        }
    }
}

impl EmitterConfig {
    /// Full module name for a BAR
    pub fn module_name(&self, bar: u8) -> String {
        format!("pcileech_bar_impl_{}_{}", self.module_header, bar)
    }

    /// Whether the configured header forms a legal Verilog identifier part
    pub fn has_valid_header(&self) -> bool {
        !self.module_header.is_empty()
            && self
                .module_header
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_')
    }
}
