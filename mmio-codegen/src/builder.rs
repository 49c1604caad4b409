//! Build coordinator
//!
//! Walks every selected BAR through the fixed fragment order and stitches
//! the results into one source text. Generators are independent, so this
//! is the only place that knows how fragments nest.

use crate::addr_check::address_check;
use crate::counter::{counter_declarations, counter_resets};
use crate::fragment::{Fragment, FragmentKind};
use crate::header::{module_close, module_header, state_machine_close, state_machine_end, state_machine_start};
use crate::logic::response_logic;
use crate::options::{BuildOptions, EmitterConfig};
use crate::rom::{rom_declarations, rom_init};
use log::{debug, info, warn};
use mmio_common::{BarSelection, Direction, MAX_BAR};
use mmio_frontend::Registry;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CodegenError {
    #[error("Invalid module header '{name}': use letters, digits and underscores")]
    InvalidModuleHeader { name: String },

    #[error("BAR {bar} is out of range (0-9)")]
    BarOutOfRange { bar: u8 },
}

/// Produce one fragment of the given kind
///
/// Directional kinds need a direction; fixed kinds ignore it.
pub fn generate(
    kind: FragmentKind,
    registry: &Registry,
    bar: u8,
    direction: Direction,
    config: &EmitterConfig,
) -> Fragment {
    match kind {
        FragmentKind::Header => module_header(bar, config),
        FragmentKind::Rom => rom_declarations(registry, bar, direction),
        FragmentKind::Counters => counter_declarations(registry, bar, direction),
        FragmentKind::AddressCheck => address_check(registry, bar, direction),
        FragmentKind::StateMachineStart => state_machine_start(),
        FragmentKind::ResetCounters => counter_resets(registry, bar, direction),
        FragmentKind::RomInit => rom_init(registry, bar, direction),
        FragmentKind::StateMachineEnd => state_machine_end(),
        FragmentKind::Logic => response_logic(registry, bar, direction),
        FragmentKind::StateMachineClose => state_machine_close(),
        FragmentKind::ModuleClose => module_close(),
    }
}

/// Fragment kinds enabled by `options`, in emission order
pub fn emission_order(options: &BuildOptions) -> Vec<FragmentKind> {
    let stages = [
        (FragmentKind::Header, true),
        (FragmentKind::Rom, true),
        (FragmentKind::Counters, options.include_counters),
        (FragmentKind::AddressCheck, options.include_address_checks),
        (FragmentKind::StateMachineStart, options.include_state_machines),
        (FragmentKind::ResetCounters, options.include_counters),
        (FragmentKind::RomInit, options.include_rom_init),
        (FragmentKind::StateMachineEnd, options.include_state_machines),
        (FragmentKind::Logic, options.include_logic),
        (FragmentKind::StateMachineClose, options.include_state_machines),
        (FragmentKind::ModuleClose, true),
    ];
    stages
        .into_iter()
        .filter(|(_, enabled)| *enabled)
        .map(|(kind, _)| kind)
        .collect()
}

/// All fragments of one BAR module, blank ones included
///
/// Empty when the BAR has no observations in any selected direction.
pub fn bar_fragments(
    registry: &Registry,
    bar: u8,
    options: &BuildOptions,
    config: &EmitterConfig,
) -> Vec<Fragment> {
    let directions = options.operation.directions();
    if !directions.iter().any(|d| registry.has_direction(bar, *d)) {
        return Vec::new();
    }

    let mut fragments = Vec::new();
    for kind in emission_order(options) {
        if kind.is_directional() {
            for direction in &directions {
                fragments.push(generate(kind, registry, bar, *direction, config));
            }
        } else {
            fragments.push(generate(kind, registry, bar, Direction::Read, config));
        }
    }
    fragments
}

/// Join the non-blank fragments of one module
pub fn render_module(fragments: &[Fragment]) -> String {
    fragments
        .iter()
        .filter(|fragment| !fragment.is_blank())
        .map(|fragment| fragment.text.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Fragments the response logic refers to that `options` switches off
pub fn unmet_logic_dependencies(options: &BuildOptions) -> Vec<FragmentKind> {
    if !options.include_logic {
        return Vec::new();
    }
    let mut missing = Vec::new();
    if !options.include_counters {
        missing.push(FragmentKind::Counters);
    }
    if !options.include_address_checks {
        missing.push(FragmentKind::AddressCheck);
    }
    missing
}

/// BARs to emit, in output order
fn selected_bars(registry: &Registry, selection: &BarSelection) -> Result<Vec<u8>, CodegenError> {
    match selection {
        BarSelection::All => Ok(registry.bars()),
        BarSelection::Bars(bars) => {
            let mut selected = Vec::new();
            for &bar in bars {
                if bar > MAX_BAR {
                    return Err(CodegenError::BarOutOfRange { bar });
                }
                if !selected.contains(&bar) {
                    selected.push(bar);
                }
            }
            Ok(selected)
        }
    }
}

/// Generate the SystemVerilog source for every selected BAR
///
/// BARs without data in the selected directions are skipped. Returns an
/// empty string when nothing was emitted.
pub fn build_verilog(
    registry: &Registry,
    options: &BuildOptions,
    config: &EmitterConfig,
) -> Result<String, CodegenError> {
    if !config.has_valid_header() {
        return Err(CodegenError::InvalidModuleHeader {
            name: config.module_header.clone(),
        });
    }

    let bars = selected_bars(registry, &options.bars)?;
    info!("Building {} for BARs {:?}", options.operation, bars);
    for missing in unmet_logic_dependencies(options) {
        warn!("Response logic enabled without {}; output will not elaborate", missing);
    }

    let mut modules = Vec::new();
    for bar in bars {
        let fragments = bar_fragments(registry, bar, options, config);
        if fragments.is_empty() {
            warn!("No {} data for BAR {}, skipping", options.operation, bar);
            continue;
        }
        debug!("BAR {}: {} fragments", bar, fragments.len());
        modules.push(render_module(&fragments));
    }

    let output = modules.join("\n");
    info!("Generated {} modules, {} bytes", modules.len(), output.len());
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mmio_common::{AlignedOperation, OperationFilter};

    fn registry(ops: &[(Direction, u8, &str, &str)]) -> Registry {
        let mut registry = Registry::new();
        for (direction, bar, address, value) in ops {
            registry
                .ingest(AlignedOperation {
                    direction: *direction,
                    bar: *bar,
                    address: address.to_string(),
                    value: value.to_string(),
                    timestamp: 0.0,
                })
                .unwrap();
        }
        registry
    }

    fn kinds(fragments: &[Fragment]) -> Vec<(FragmentKind, Option<Direction>)> {
        fragments.iter().map(|f| (f.kind, f.direction)).collect()
    }

    #[test]
    fn test_full_emission_order() {
        let registry = registry(&[(Direction::Read, 0, "00100", "00000005")]);
        let fragments = bar_fragments(&registry, 0, &BuildOptions::default(), &EmitterConfig::default());

        let r = Some(Direction::Read);
        let w = Some(Direction::Write);
        assert_eq!(
            kinds(&fragments),
            vec![
                (FragmentKind::Header, None),
                (FragmentKind::Rom, r),
                (FragmentKind::Rom, w),
                (FragmentKind::Counters, r),
                (FragmentKind::Counters, w),
                (FragmentKind::AddressCheck, r),
                (FragmentKind::AddressCheck, w),
                (FragmentKind::StateMachineStart, None),
                (FragmentKind::ResetCounters, r),
                (FragmentKind::ResetCounters, w),
                (FragmentKind::RomInit, r),
                (FragmentKind::RomInit, w),
                (FragmentKind::StateMachineEnd, None),
                (FragmentKind::Logic, r),
                (FragmentKind::Logic, w),
                (FragmentKind::StateMachineClose, None),
                (FragmentKind::ModuleClose, None),
            ]
        );
    }

    #[test]
    fn test_disabled_stages_are_not_emitted() {
        let options = BuildOptions {
            operation: OperationFilter::Write,
            include_counters: false,
            include_state_machines: false,
            include_rom_init: false,
            ..BuildOptions::default()
        };
        assert_eq!(
            emission_order(&options),
            vec![
                FragmentKind::Header,
                FragmentKind::Rom,
                FragmentKind::AddressCheck,
                FragmentKind::Logic,
                FragmentKind::ModuleClose,
            ]
        );
    }

    #[test]
    fn test_bar_without_selected_direction_is_empty() {
        let registry = registry(&[(Direction::Read, 0, "00100", "00000005")]);
        let options = BuildOptions {
            operation: OperationFilter::Write,
            ..BuildOptions::default()
        };
        assert!(bar_fragments(&registry, 0, &options, &EmitterConfig::default()).is_empty());
        assert_eq!(
            build_verilog(&registry, &options, &EmitterConfig::default()),
            Ok(String::new())
        );
    }

    #[test]
    fn test_bar_selection_dedupes_and_checks_range() {
        let registry = registry(&[(Direction::Read, 2, "00100", "00000005")]);
        assert_eq!(
            selected_bars(&registry, &BarSelection::Bars(vec![3, 2, 3])),
            Ok(vec![3, 2])
        );
        assert_eq!(selected_bars(&registry, &BarSelection::All), Ok(vec![2]));

        let options = BuildOptions {
            bars: BarSelection::Bars(vec![12]),
            ..BuildOptions::default()
        };
        assert_eq!(
            build_verilog(&registry, &options, &EmitterConfig::default()),
            Err(CodegenError::BarOutOfRange { bar: 12 })
        );
    }

    #[test]
    fn test_invalid_module_header() {
        let registry = registry(&[(Direction::Read, 0, "00100", "00000005")]);
        let config = EmitterConfig {
            module_header: "my-bar".to_string(),
        };
        assert!(matches!(
            build_verilog(&registry, &BuildOptions::default(), &config),
            Err(CodegenError::InvalidModuleHeader { .. })
        ));
    }

    #[test]
    fn test_logic_dependencies() {
        assert!(unmet_logic_dependencies(&BuildOptions::default()).is_empty());

        let options = BuildOptions {
            include_counters: false,
            include_address_checks: false,
            ..BuildOptions::default()
        };
        assert_eq!(
            unmet_logic_dependencies(&options),
            vec![FragmentKind::Counters, FragmentKind::AddressCheck]
        );

        let options = BuildOptions {
            include_logic: false,
            ..options
        };
        assert!(unmet_logic_dependencies(&options).is_empty());
    }

    #[test]
    fn test_render_skips_blank_fragments() {
        let fragments = vec![
            Fragment::fixed(FragmentKind::Header, "a\n".to_string()),
            Fragment::directional(FragmentKind::Rom, Direction::Write, String::new()),
            Fragment::fixed(FragmentKind::ModuleClose, "b\n".to_string()),
        ];
        assert_eq!(render_module(&fragments), "a\n\nb\n");
    }
}
