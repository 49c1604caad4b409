//! MMIO Trace Replay Generator Driver
//!
//! `mmio2sv generate` turns an MMIO trace into one SystemVerilog module per
//! BAR; `mmio2sv inspect` prints what the trace contains.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use mmio_common::OperationFilter;
use mmio_driver::config::{Overrides, Settings};
use mmio_driver::io::{default_output_path, FileSink, FileSource};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "mmio2sv")]
#[command(about = "Generate SystemVerilog BAR replay modules from MMIO traces")]
#[command(version = "0.1.0")]
struct Cli {
    /// Debug logging (otherwise RUST_LOG, default warn)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate SystemVerilog from a trace file
    Generate {
        /// Input trace file
        input: PathBuf,

        /// Output file (defaults to <input stem>.sv)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// JSON settings file
        #[arg(long)]
        config: Option<PathBuf>,

        /// BARs to emit, e.g. 0,2 (defaults to every BAR in the trace)
        #[arg(long, value_delimiter = ',')]
        bars: Option<Vec<u8>>,

        /// Directions to emit: R, W or B
        #[arg(long)]
        operation: Option<OperationFilter>,

        #[arg(long)]
        no_address_checks: bool,

        #[arg(long)]
        no_counters: bool,

        #[arg(long)]
        no_logic: bool,

        #[arg(long)]
        no_state_machines: bool,

        #[arg(long)]
        no_rom_init: bool,

        /// Middle part of the module name
        #[arg(long)]
        module_header: Option<String>,
    },

    /// Print the registers, value counts and defaults found in a trace
    Inspect {
        /// Input trace file
        input: PathBuf,

        /// Only show this BAR
        #[arg(long)]
        bar: Option<u8>,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Generate {
            input,
            output,
            config,
            bars,
            operation,
            no_address_checks,
            no_counters,
            no_logic,
            no_state_machines,
            no_rom_init,
            module_header,
        } => {
            let overrides = Overrides {
                bars,
                operation,
                no_address_checks,
                no_counters,
                no_logic,
                no_state_machines,
                no_rom_init,
                module_header,
            };
            generate_command(&input, output, config.as_deref(), &overrides)
        }
        Commands::Inspect { input, bar } => inspect_command(&input, bar),
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let mut builder = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.init();
}

fn generate_command(
    input: &Path,
    output: Option<PathBuf>,
    config: Option<&Path>,
    overrides: &Overrides,
) -> Result<()> {
    let mut settings = match config {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    settings.apply(overrides);

    let output = output.unwrap_or_else(|| default_output_path(input));
    let source = FileSource::new(input);
    let mut sink = FileSink::new(&output);

    let report = mmio_driver::generate(&source, &mut sink, &settings)
        .with_context(|| format!("Failed to generate from {}", input.display()))?;

    report.diagnostics.print_diagnostics();
    println!("{}", report.stats);
    println!("{}", report.diagnostics.summary());
    if report.written {
        println!("Wrote {} bytes to {}", report.bytes, sink.path().display());
    } else {
        println!("No data for the selected BARs, nothing written");
    }
    Ok(())
}

fn inspect_command(input: &Path, bar: Option<u8>) -> Result<()> {
    let source = FileSource::new(input);
    let (summary, stats) = mmio_driver::inspect(&source, bar)
        .with_context(|| format!("Failed to inspect {}", input.display()))?;

    print!("{}", summary);
    println!("{}", stats);
    Ok(())
}
