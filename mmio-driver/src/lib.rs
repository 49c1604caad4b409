//! MMIO Trace Replay Generator - Driver
//!
//! Glue between the trace file, the frontend, the code generator and the
//! output file. The `mmio2sv` binary is a thin clap layer over
//! [`generate`] and [`inspect`].

pub mod config;
pub mod io;

use config::Settings;
use io::{OutputSink, TraceSource};
use log::{info, warn};
use mmio_codegen::{build_verilog, CodegenError};
use mmio_common::{Direction, DiagnosticReporter, TraceError};
use mmio_frontend::{Frontend, IngestStats, Registry};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DriverError {
    #[error("Cannot write {name}: {source}")]
    Write {
        name: String,
        source: std::io::Error,
    },

    #[error(transparent)]
    Trace(#[from] TraceError),

    #[error(transparent)]
    Codegen(#[from] CodegenError),
}

/// Outcome of one generate run
#[derive(Debug)]
pub struct GenerateReport {
    pub stats: IngestStats,
    pub diagnostics: DiagnosticReporter,
    /// Size of the generated source
    pub bytes: usize,
    /// False when nothing was generated and the sink was left alone
    pub written: bool,
}

fn read_trace(source: &dyn TraceSource) -> Result<String, TraceError> {
    source.read().map_err(|err| TraceError::io(&source.describe(), &err))
}

/// Read a trace, generate SystemVerilog and hand it to the sink
///
/// The sink is not called when no BAR produced any output.
pub fn generate(
    source: &dyn TraceSource,
    sink: &mut dyn OutputSink,
    settings: &Settings,
) -> Result<GenerateReport, DriverError> {
    let text = read_trace(source)?;
    let ingested = Frontend::ingest(&text)?;
    let verilog = build_verilog(&ingested.registry, &settings.build, &settings.emitter)?;

    let written = !verilog.is_empty();
    if written {
        sink.write(&verilog).map_err(|err| DriverError::Write {
            name: sink.describe(),
            source: err,
        })?;
        info!("Wrote {} bytes to {}", verilog.len(), sink.describe());
    } else {
        warn!("No BAR produced output, nothing written to {}", sink.describe());
    }

    Ok(GenerateReport {
        stats: ingested.stats,
        diagnostics: ingested.diagnostics,
        bytes: verilog.len(),
        written,
    })
}

/// Human-readable registry summary: per BAR, every register with its
/// value count and bit width, then the BAR defaults
///
/// A requested BAR without data is listed with no registers.
pub fn registry_summary(registry: &Registry, bar: Option<u8>) -> String {
    let bars = match bar {
        Some(bar) => {
            if !registry.has_data(bar) {
                warn!("{}", TraceError::NoDataForBar { bar });
            }
            vec![bar]
        }
        None => registry.bars(),
    };

    let mut out = String::new();
    for bar in bars {
        let registers: usize = Direction::ALL
            .iter()
            .map(|d| registry.unique_addresses(bar, *d).len())
            .sum();
        out.push_str(&format!(
            "BAR {}: {} register{}\n",
            bar,
            registers,
            if registers == 1 { "" } else { "s" }
        ));

        for direction in Direction::ALL {
            for address in registry.unique_addresses(bar, direction) {
                out.push_str(&format!(
                    "  {} {}: {} observed, {} bits\n",
                    direction,
                    address,
                    registry.count(bar, &address, direction),
                    registry.bit_width(&address)
                ));
            }
        }

        let (read, write) = registry.defaults(bar);
        out.push_str(&format!("  defaults: read {}, write {}\n", read, write));
    }
    out
}

/// Read a trace and summarize its registry
pub fn inspect(source: &dyn TraceSource, bar: Option<u8>) -> Result<(String, IngestStats), DriverError> {
    let text = read_trace(source)?;
    let ingested = Frontend::ingest(&text)?;
    let summary = registry_summary(&ingested.registry, bar);
    Ok((summary, ingested.stats))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::{MemorySink, StringSource};
    use pretty_assertions::assert_eq;

    const TRACE: &str = "R 1 0.1 0 0xf7000100 0x5 0x0 0\n\
                         R 2 0.2 0 0xf7000100 0x9 0x0 0\n\
                         W 3 0.3 0 0xf7000011 0x1 0x0 0\n";

    #[test]
    fn test_generate_writes_once() {
        let mut sink = MemorySink::default();
        let report = generate(&StringSource::new(TRACE), &mut sink, &Settings::default()).unwrap();

        assert!(report.written);
        assert_eq!(sink.writes.len(), 1);
        assert_eq!(report.bytes, sink.writes[0].len());
        assert_eq!(report.stats.processed, 3);
        assert!(!report.diagnostics.has_warnings());
    }

    #[test]
    fn test_empty_output_is_not_written() {
        let mut settings = Settings::default();
        settings.build.bars = mmio_common::BarSelection::Bars(vec![4]);

        let mut sink = MemorySink::default();
        let report = generate(&StringSource::new(TRACE), &mut sink, &settings).unwrap();
        assert!(!report.written);
        assert!(sink.writes.is_empty());
    }

    #[test]
    fn test_empty_trace_is_structural_failure() {
        let mut sink = MemorySink::default();
        let err = generate(&StringSource::new("\n  \n"), &mut sink, &Settings::default()).unwrap_err();
        assert!(matches!(err, DriverError::Trace(TraceError::EmptyInput)));
    }

    #[test]
    fn test_registry_summary() {
        let (summary, stats) = inspect(&StringSource::new(TRACE), None).unwrap();
        assert_eq!(
            summary,
            "BAR 0: 2 registers\n  R 00100: 2 observed, 4 bits\n  W 00010: 1 observed, 9 bits\n  defaults: read 00000005, write 00000100\n"
        );
        assert_eq!(stats.processed, 3);
    }

    #[test]
    fn test_summary_for_missing_bar_is_empty() {
        let (summary, _) = inspect(&StringSource::new(TRACE), Some(3)).unwrap();
        assert_eq!(
            summary,
            "BAR 3: 0 registers\n  defaults: read 00000000, write 00000000\n"
        );
    }

    #[test]
    fn test_summary_for_one_bar() {
        let (summary, _) = inspect(&StringSource::new(TRACE), Some(0)).unwrap();
        assert!(summary.starts_with("BAR 0: 2 registers\n"));
    }

    #[test]
    fn test_unreadable_source_is_structural() {
        struct Broken;
        impl TraceSource for Broken {
            fn read(&self) -> std::io::Result<String> {
                Err(std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"))
            }
            fn describe(&self) -> String {
                "broken".to_string()
            }
        }

        let mut sink = MemorySink::default();
        let err = generate(&Broken, &mut sink, &Settings::default()).unwrap_err();
        match err {
            DriverError::Trace(trace) => {
                assert!(trace.is_structural());
                assert_eq!(trace.to_string(), "IO error: broken: denied");
            }
            other => panic!("unexpected error: {}", other),
        }
        assert!(sink.writes.is_empty());
    }
}
