//! `fpgalab calc|alu|regfile|counter`: run a single testbench.

use fpgalab_verify::{run_bench_observed, Bench, CommitRecord, HarnessReport};

use crate::pipeline::{bench_config, live_sink, print_reports, waveform_note};
use crate::{BenchArgs, GlobalArgs};

/// Runs one bench. Returns exit code 0 if every check passed, 1 otherwise.
pub fn run(bench: Bench, args: &BenchArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let config = bench_config(global, args)?;

    if !global.quiet {
        eprintln!(
            "   Running {} (seed {}, clock {})",
            bench.name(),
            config.harness.seed,
            config.clock.frequency
        );
        if global.verbose {
            if let Some(path) = waveform_note(&config).filter(|_| bench == Bench::Calc) {
                eprintln!("   Waveform {}", path.display());
            }
            if config.harness.halt_on_failure {
                eprintln!("   Halting on first failure");
            }
        }
    }

    let sink = live_sink(global);
    let mut show_commit = |record: &CommitRecord| print_commit(record);
    let observer: Option<&mut dyn FnMut(&CommitRecord)> = if global.verbose && !global.quiet {
        Some(&mut show_commit)
    } else {
        None
    };
    let report = run_bench_observed(bench, &config, &sink, observer)?;

    if !global.quiet {
        print_summary(&report, global.verbose);
    }
    print_reports(std::slice::from_ref(&report), report.passed(), global)?;

    Ok(if report.passed() { 0 } else { 1 })
}

/// Prints the status line for one finished bench.
pub fn print_summary(report: &HarnessReport, verbose: bool) {
    if report.passed() {
        eprintln!("   PASS  {} ({} checks)", report.name, report.checks);
    } else {
        eprintln!(
            "   FAIL  {}: {} of {} check(s) failed",
            report.name, report.failures, report.checks
        );
    }
    if verbose {
        eprintln!("         {report}");
    }
}

/// Prints one checked commit.
fn print_commit(record: &CommitRecord) {
    let leds = match record.leds {
        Some(value) => format!("0x{value:04X}"),
        None => "unknown".to_string(),
    };
    eprintln!(
        "         tick {:>5}  {:<3} 0x{:04X} -> {leds}",
        record.tick, record.vector.op, record.vector.operand
    );
}
