//! MMIO Trace Replay Generator - Frontend
//!
//! This crate turns raw MMIO trace text into an observation registry:
//! - Parser: tokenizes one trace line into a raw record
//! - Aligner: folds byte accesses onto their dword register
//! - Validation: normalizes fields before they reach the registry
//! - Registry: ordered value sequences, bit widths and defaults per BAR

pub mod align;
pub mod parser;
pub mod registry;
pub mod validate;

pub use align::{align, Alignment};
pub use parser::parse_line;
pub use registry::Registry;

use log::{debug, info, warn};
use mmio_common::{DiagnosticReporter, TraceError};
use std::fmt;

/// Per-run record counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestStats {
    /// Lines seen in the input
    pub lines: usize,
    /// Records accepted into the registry
    pub processed: usize,
    /// Non-operation lines
    pub skipped: usize,
    /// Lines dropped for bad field count or hex
    pub malformed: usize,
    /// Records dropped by validation
    pub rejected: usize,
}

impl IngestStats {
    /// Records dropped for any reason
    pub fn dropped(&self) -> usize {
        self.malformed + self.rejected
    }
}

impl fmt::Display for IngestStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} records processed, {} dropped ({} malformed, {} invalid), {} lines skipped",
            self.processed,
            self.dropped(),
            self.malformed,
            self.rejected,
            self.skipped
        )
    }
}

/// Everything one ingest run produces
#[derive(Debug)]
pub struct Ingested {
    pub registry: Registry,
    pub stats: IngestStats,
    pub diagnostics: DiagnosticReporter,
}

/// High-level frontend interface
pub struct Frontend;

impl Frontend {
    /// Parse, align, validate and aggregate a whole trace
    ///
    /// A fresh registry is built for every call. Bad records are dropped and
    /// reported in the returned diagnostics; only empty input is an error.
    pub fn ingest(source: &str) -> Result<Ingested, TraceError> {
        if source.trim().is_empty() {
            return Err(TraceError::EmptyInput);
        }

        let mut registry = Registry::new();
        let mut stats = IngestStats::default();
        let mut diagnostics = DiagnosticReporter::new();

        for (index, line) in source.lines().enumerate() {
            let line_number = index + 1;
            stats.lines += 1;

            match Self::ingest_line(&mut registry, line, line_number) {
                Ok(()) => stats.processed += 1,
                Err(TraceError::SkippedLine) => {
                    debug!("Skipped non-R/W line {}", line_number);
                    if !line.trim().is_empty() {
                        diagnostics.note("not an R/W record, skipped".to_string(), line_number);
                    }
                    stats.skipped += 1;
                }
                Err(err) if err.is_structural() => return Err(err),
                Err(err @ TraceError::MalformedLine { .. }) => {
                    warn!("{}", err);
                    diagnostics.report(&err);
                    stats.malformed += 1;
                }
                Err(err) => {
                    warn!("{}", err);
                    diagnostics.report(&err);
                    stats.rejected += 1;
                }
            }
        }

        info!("Ingested trace: {}", stats);
        Ok(Ingested {
            registry,
            stats,
            diagnostics,
        })
    }

    fn ingest_line(registry: &mut Registry, line: &str, line_number: usize) -> Result<(), TraceError> {
        let record = parse_line(line, line_number)?;
        let alignment = align(&record.raw_address, &record.raw_value).map_err(|e| e.at_line(line_number))?;
        let op = validate::normalize(&record, &alignment, line_number)?;
        registry.ingest(op).map_err(|e| e.at_line(line_number))
    }
}
