//! Self-checking testbenches for the lab designs.
//!
//! Each harness drives a design from `fpgalab_sim` tick by tick, mirrors the
//! stimulus into an independent reference model from [`model`] and reports
//! every disagreement as a diagnostic. A run ends in a [`HarnessReport`]; it
//! passes only when no check failed.

#![warn(missing_docs)]

pub mod alu;
pub mod calc;
pub mod counter;
pub mod error;
pub mod model;
pub mod regfile;
pub mod report;
pub mod scoreboard;
pub mod stimulus;

use std::fs::File;
use std::io::BufWriter;

use fpgalab_config::LabConfig;
use fpgalab_diagnostics::DiagnosticSink;
use fpgalab_sim::VcdRecorder;

pub use alu::AluHarness;
pub use calc::{CalculatorDut, CalculatorHarness, CommitRecord};
pub use counter::CounterHarness;
pub use error::VerifyError;
pub use model::{reference_alu, CounterModel, Expected, ScoreboardModel};
pub use regfile::RegfileHarness;
pub use report::{HarnessReport, FAIL_BANNER, PASS_BANNER};
pub use scoreboard::Scoreboard;
pub use stimulus::{directed_vectors, PressTiming, TestVector};

/// The testbenches that can be run by name.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Bench {
    /// The accumulating calculator.
    Calc,
    /// The ALU over every control code.
    Alu,
    /// The register file.
    Regfile,
    /// The up/down counter.
    Counter,
}

impl Bench {
    /// Every bench, in the order `test` runs them.
    pub const ALL: [Bench; 4] = [Bench::Alu, Bench::Regfile, Bench::Counter, Bench::Calc];

    /// Name used in reports and on the command line.
    pub fn name(self) -> &'static str {
        match self {
            Bench::Calc => "calc",
            Bench::Alu => "alu",
            Bench::Regfile => "regfile",
            Bench::Counter => "counter",
        }
    }
}

/// Runs one bench as configured.
///
/// The calculator bench also writes a VCD file when `[waveform]` is enabled.
pub fn run_bench(
    bench: Bench,
    config: &LabConfig,
    sink: &DiagnosticSink,
) -> Result<HarnessReport, VerifyError> {
    run_bench_observed(bench, config, sink, None)
}

/// [`run_bench`], reporting each calculator commit to `on_commit`.
pub fn run_bench_observed(
    bench: Bench,
    config: &LabConfig,
    sink: &DiagnosticSink,
    on_commit: Option<&mut dyn FnMut(&CommitRecord)>,
) -> Result<HarnessReport, VerifyError> {
    let period_ps = config.clock_frequency()?.period_ps();
    let seed = config.harness.seed;
    let halt = config.harness.halt_on_failure;
    match bench {
        Bench::Calc => {
            let mut harness = CalculatorHarness::new(&config.harness, period_ps, sink)?;
            if let Some(observer) = on_commit {
                harness = harness.with_commit_observer(observer);
            }
            if !config.waveform.enabled {
                return harness.run();
            }
            let file = File::create(&config.waveform.path)?;
            let mut vcd = VcdRecorder::new(BufWriter::new(file), "calc", period_ps);
            let mut traced = harness.with_trace(&mut vcd)?;
            traced.run()
        }
        Bench::Alu => AluHarness::new(&config.alu, seed, halt, sink).run(),
        Bench::Regfile => RegfileHarness::new(&config.regfile, seed, period_ps, halt, sink).run(),
        Bench::Counter => CounterHarness::new(&config.counter, seed, period_ps, halt, sink)?.run(),
    }
}
