//! Conformance helpers for the fpgalab designs.
//!
//! Drives the calculator pin by pin and runs the testbenches with small
//! configurations, returning structured results for assertion in the
//! integration tests.

#![warn(missing_docs)]

use fpgalab_common::{Logic, LogicWord};
use fpgalab_config::HarnessConfig;
use fpgalab_diagnostics::{Diagnostic, DiagnosticSink};
use fpgalab_sim::{
    AluOp, Calculator, CalculatorInputs, ControlAction, MemoryTrace, CALC_WIDTH, COMMIT_LATENCY,
};
use fpgalab_verify::{CalculatorHarness, CommitRecord, HarnessReport};

/// Clock period used by the helpers: 100 MHz.
pub const PERIOD_PS: u64 = 10_000;

/// What one press did to the calculator.
pub struct PressOutcome {
    /// Edges on which the accumulator took an ALU result.
    pub updates: usize,
    /// LEDs after the release ticks.
    pub leds: LogicWord,
}

/// Result of running the calculator testbench.
pub struct CalcRun {
    /// The final report.
    pub report: HarnessReport,
    /// Every diagnostic emitted.
    pub diagnostics: Vec<Diagnostic>,
    /// Every commit the harness checked.
    pub history: Vec<CommitRecord>,
}

/// A calculator after power-up and a full-length reset.
pub fn reset_calculator() -> Calculator {
    let mut calc = Calculator::new(CALC_WIDTH).unwrap();
    hold_reset(&mut calc, COMMIT_LATENCY);
    calc
}

/// Holds reset with the commit button released for `ticks` edges.
pub fn hold_reset(calc: &mut Calculator, ticks: u64) {
    let mut inputs = CalculatorInputs::idle(CALC_WIDTH);
    inputs.btnu = Logic::One;
    for _ in 0..ticks {
        calc.advance(&inputs);
    }
}

/// Selects `op`, sets the switches and presses commit for `hold` ticks,
/// then releases for `release` ticks.
pub fn press(calc: &mut Calculator, op: AluOp, operand: u16, hold: u64, release: u64) -> PressOutcome {
    let mut inputs = CalculatorInputs::idle(CALC_WIDTH);
    assert!(inputs.select(op), "{op} is not selectable");
    inputs.set_operand(operand as u64);
    let mut updates = 0;
    inputs.btnd = Logic::One;
    for i in 0..hold + release {
        if i == hold {
            inputs.btnd = Logic::Zero;
        }
        if matches!(calc.advance(&inputs).action, ControlAction::Accumulate(_)) {
            updates += 1;
        }
    }
    PressOutcome {
        updates,
        leds: calc.leds(),
    }
}

/// A press long enough for any hold length to land.
pub fn commit(calc: &mut Calculator, op: AluOp, operand: u16) -> Option<u64> {
    press(calc, op, operand, 4, COMMIT_LATENCY).leds.to_u64()
}

/// Harness settings small enough for fast tests.
pub fn small_config(seed: u64) -> HarnessConfig {
    HarnessConfig {
        seed,
        random_per_op: 4,
        idle_events: 6,
        ..HarnessConfig::default()
    }
}

/// Runs the calculator testbench against the behavioral design.
pub fn run_calc(config: &HarnessConfig) -> CalcRun {
    let sink = DiagnosticSink::new();
    let mut harness = CalculatorHarness::new(config, PERIOD_PS, &sink).unwrap();
    let report = harness.run().unwrap();
    let history = harness.history().to_vec();
    drop(harness);
    CalcRun {
        report,
        diagnostics: sink.take_all(),
        history,
    }
}

/// Runs the calculator testbench and records every pin on every tick.
pub fn trace_calc(config: &HarnessConfig) -> (HarnessReport, MemoryTrace) {
    let sink = DiagnosticSink::new();
    let mut trace = MemoryTrace::new();
    let report = CalculatorHarness::new(config, PERIOD_PS, &sink)
        .unwrap()
        .with_trace(&mut trace)
        .unwrap()
        .run()
        .unwrap();
    (report, trace)
}
