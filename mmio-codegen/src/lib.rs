//! MMIO Trace Replay Generator - SystemVerilog Code Generation
//!
//! This crate turns an observation registry into one SystemVerilog module
//! per BAR. It includes:
//!
//! - Module scaffolding (ports, address decode, clocked block)
//! - ROM declarations and initialization in trace order
//! - Sequence counters for registers with more than one value
//! - Address check functions
//! - Response logic for reads and writes
//! - The build coordinator that orders and joins the fragments

pub mod addr_check;
pub mod builder;
pub mod counter;
pub mod fragment;
pub mod header;
pub mod logic;
pub mod options;
pub mod rom;

pub use builder::{
    bar_fragments, build_verilog, emission_order, render_module, unmet_logic_dependencies,
    CodegenError,
};
pub use fragment::{Fragment, FragmentKind};
pub use options::{BuildOptions, EmitterConfig, DEFAULT_MODULE_HEADER};
