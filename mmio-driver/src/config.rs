//! Run settings
//!
//! Settings come from three layers: built-in defaults, an optional JSON
//! file, then command-line overrides. Later layers win.

use mmio_codegen::{BuildOptions, EmitterConfig};
use mmio_common::{BarSelection, OperationFilter};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Everything one generate run is configured with
///
/// ```json
/// { "build": { "operation": "R", "bars": { "bars": [0, 2] } },
///   "emitter": { "module_header": "nic" } }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub build: BuildOptions,
    pub emitter: EmitterConfig,
}

/// Command-line values that replace configured ones when present
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    pub bars: Option<Vec<u8>>,
    pub operation: Option<OperationFilter>,
    pub no_address_checks: bool,
    pub no_counters: bool,
    pub no_logic: bool,
    pub no_state_machines: bool,
    pub no_rom_init: bool,
    pub module_header: Option<String>,
}

impl Settings {
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Load settings from a JSON file; missing fields keep their defaults
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Apply command-line overrides on top of these settings
    pub fn apply(&mut self, overrides: &Overrides) {
        if let Some(bars) = &overrides.bars {
            self.build.bars = BarSelection::Bars(bars.clone());
        }
        if let Some(operation) = overrides.operation {
            self.build.operation = operation;
        }
        // Flags can only switch features off
        if overrides.no_address_checks {
            self.build.include_address_checks = false;
        }
        if overrides.no_counters {
            self.build.include_counters = false;
        }
        if overrides.no_logic {
            self.build.include_logic = false;
        }
        if overrides.no_state_machines {
            self.build.include_state_machines = false;
        }
        if overrides.no_rom_init {
            self.build.include_rom_init = false;
        }
        if let Some(header) = &overrides.module_header {
            self.emitter.module_header = header.clone();
        }
    }
}
