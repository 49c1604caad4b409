//! MMIO Trace Replay Generator - Common Types and Utilities
//!
//! This crate contains shared record types, error definitions, and
//! diagnostics used by the trace frontend, the Verilog code generator
//! and the driver.

pub mod error;
pub mod types;

pub use error::{Diagnostic, DiagnosticReporter, Severity, TraceError};
pub use types::*;
