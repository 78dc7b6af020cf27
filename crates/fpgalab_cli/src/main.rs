//! fpgalab CLI: runs the lab testbenches from the command line.
//!
//! `fpgalab calc`, `alu`, `regfile` and `counter` run one self-checking
//! testbench each; `fpgalab test` runs all of them and prints a summary.

#![warn(missing_docs)]

mod bench;
mod pipeline;

use std::io::IsTerminal;
use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use fpgalab_verify::Bench;

/// fpgalab: simulate and verify the digital-design lab circuits.
#[derive(Parser, Debug)]
#[command(name = "fpgalab", version, about = "FPGA lab testbenches")]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Print per-bench settings and summaries.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Control colored output.
    #[arg(long, global = true, value_enum, default_value_t = ColorChoice::Auto)]
    pub color: ColorChoice,

    /// Path to an `fpgalab.toml` file or the directory holding one.
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Output format for diagnostics and reports.
    #[arg(short, long, global = true, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Verify the accumulating calculator.
    Calc(BenchArgs),
    /// Verify the ALU over every control code.
    Alu(BenchArgs),
    /// Verify the register file.
    Regfile(BenchArgs),
    /// Verify the up/down button counter.
    Counter(BenchArgs),
    /// Run every testbench.
    Test(BenchArgs),
}

/// Overrides shared by every bench command.
#[derive(Parser, Debug, Default)]
pub struct BenchArgs {
    /// Seed for the random stimulus (overrides `harness.seed`).
    #[arg(long)]
    pub seed: Option<u64>,

    /// Stop at the first failed check.
    #[arg(long)]
    pub halt_on_failure: bool,

    /// Write the calculator waveform to this VCD file.
    #[arg(long)]
    pub vcd: Option<PathBuf>,
}

/// Controls whether colored output is produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ColorChoice {
    /// Detect from terminal capabilities.
    Auto,
    /// Always produce colored output.
    Always,
    /// Never produce colored output.
    Never,
}

/// Diagnostic output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Human-readable terminal output.
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// Global settings derived from CLI flags.
pub struct GlobalArgs {
    /// Whether to suppress non-error output.
    pub quiet: bool,
    /// Whether to print verbose information.
    pub verbose: bool,
    /// Whether to use colored output.
    pub color: bool,
    /// Optional path to a config file or directory.
    pub config: Option<String>,
    /// Output format.
    pub format: ReportFormat,
}

fn main() {
    let cli = Cli::parse();

    let color = match cli.color {
        ColorChoice::Auto => std::io::stderr().is_terminal(),
        ColorChoice::Always => true,
        ColorChoice::Never => false,
    };

    let global = GlobalArgs {
        quiet: cli.quiet,
        verbose: cli.verbose,
        color,
        config: cli.config,
        format: cli.format,
    };

    let result = match cli.command {
        Command::Calc(ref args) => bench::run(Bench::Calc, args, &global),
        Command::Alu(ref args) => bench::run(Bench::Alu, args, &global),
        Command::Regfile(ref args) => bench::run(Bench::Regfile, args, &global),
        Command::Counter(ref args) => bench::run(Bench::Counter, args, &global),
        Command::Test(ref args) => test::run(args, &global),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}
