//! Self-checking testbench for the accumulating calculator.
//!
//! The harness owns the design's input pins and drives them one tick at a
//! time. Every commit is mirrored into [`ScoreboardModel`] and the LEDs are
//! compared once the press has had time to land. Between commits the LEDs
//! are checked on every edge for changes nobody asked for.
//!
//! A run has three phases after the power-up reset:
//!
//! 1. the directed vectors from [`directed_vectors`],
//! 2. seeded random vectors shuffled together with idle switch changes,
//! 3. a reset part-way through the directed list, then the full list again.

use fpgalab_common::{Logic, LogicWord};
use fpgalab_config::HarnessConfig;
use fpgalab_diagnostics::{Diagnostic, DiagnosticCode, DiagnosticSink};
use fpgalab_sim::{
    function_select, AluOp, Calculator, CalculatorInputs, TraceRecorder, TraceSignalId,
    CALC_WIDTH, COMMIT_LATENCY, FUNCTION_WIDTH,
};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::error::VerifyError;
use crate::model::ScoreboardModel;
use crate::report::HarnessReport;
use crate::scoreboard::Scoreboard;
use crate::stimulus::{directed_vectors, idle_vectors, random_vectors, PressTiming, TestVector};

/// The pins the harness needs from a calculator design.
pub trait CalculatorDut {
    /// Current LED outputs.
    fn leds(&self) -> LogicWord;

    /// Clocks one edge and returns the commit pulse sampled on it.
    fn advance(&mut self, inputs: &CalculatorInputs) -> Logic;
}

impl CalculatorDut for Calculator {
    fn leds(&self) -> LogicWord {
        Calculator::leds(self)
    }

    fn advance(&mut self, inputs: &CalculatorInputs) -> Logic {
        Calculator::advance(self, inputs).pulse
    }
}

/// One commit as seen by the harness.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct CommitRecord {
    /// Tick at which the result was checked.
    pub tick: u64,
    /// What was pressed.
    pub vector: TestVector,
    /// LED value observed, if fully known.
    pub leds: Option<u64>,
}

struct CalcTrace<'a> {
    recorder: &'a mut dyn TraceRecorder,
    btnu: TraceSignalId,
    btnd: TraceSignalId,
    function: TraceSignalId,
    sw: TraceSignalId,
    pulse: TraceSignalId,
    leds: TraceSignalId,
}

fn bit(level: Logic) -> LogicWord {
    let mut word = LogicWord::zero(1);
    word.set(0, level);
    word
}

enum Step {
    Commit(TestVector),
    Idle(TestVector),
}

/// Drives a calculator design and checks it against the reference model.
pub struct CalculatorHarness<'a, D: CalculatorDut = Calculator> {
    dut: D,
    model: ScoreboardModel,
    inputs: CalculatorInputs,
    tick: u64,
    config: HarnessConfig,
    timing: PressTiming,
    scoreboard: Scoreboard<'a>,
    trace: Option<CalcTrace<'a>>,
    on_commit: Option<&'a mut dyn FnMut(&CommitRecord)>,
    history: Vec<CommitRecord>,
}

impl<'a> CalculatorHarness<'a, Calculator> {
    /// Creates a harness around a fresh calculator in its power-up state.
    pub fn new(
        config: &HarnessConfig,
        period_ps: u64,
        sink: &'a DiagnosticSink,
    ) -> Result<Self, VerifyError> {
        Ok(Self::with_dut(Calculator::new(CALC_WIDTH)?, config, period_ps, sink))
    }
}

impl<'a, D: CalculatorDut> CalculatorHarness<'a, D> {
    /// Creates a harness around an arbitrary design.
    ///
    /// A press that cannot commit exactly once (no hold, no release, or
    /// shorter than the commit latency) is padded and reported once as a
    /// short-press warning.
    pub fn with_dut(dut: D, config: &HarnessConfig, period_ps: u64, sink: &'a DiagnosticSink) -> Self {
        let requested = PressTiming {
            setup: config.setup_ticks as u64,
            hold: config.hold_ticks as u64,
            release: config.release_ticks as u64,
        };
        let (timing, padded) = requested.padded(COMMIT_LATENCY);
        let mut scoreboard = Scoreboard::new("calc", sink, period_ps, config.halt_on_failure);
        if padded {
            scoreboard.warn(
                0,
                Diagnostic::warning(
                    DiagnosticCode::SHORT_PRESS,
                    format!(
                        "press of hold {} and release {} cannot commit once per press (latency {})",
                        requested.hold, requested.release, COMMIT_LATENCY
                    ),
                )
                .with_note(format!(
                    "padded to hold {} and release {} ticks",
                    timing.hold, timing.release
                ))
                .with_help("raise hold_ticks or release_ticks in [harness]"),
            );
        }
        let width = dut.leds().width();
        Self {
            dut,
            model: ScoreboardModel::new(width),
            inputs: CalculatorInputs::idle(width),
            tick: 0,
            config: config.clone(),
            timing,
            scoreboard,
            trace: None,
            on_commit: None,
            history: Vec::new(),
        }
    }

    /// Records every pin into `recorder` on each tick.
    pub fn with_trace(mut self, recorder: &'a mut dyn TraceRecorder) -> Result<Self, VerifyError> {
        let width = self.inputs.sw.width();
        let btnu = recorder.register_signal("btnu", 1)?;
        let btnd = recorder.register_signal("btnd", 1)?;
        let function = recorder.register_signal("function", FUNCTION_WIDTH)?;
        let sw = recorder.register_signal("sw", width)?;
        let pulse = recorder.register_signal("pulse", 1)?;
        let leds = recorder.register_signal("leds", width)?;
        self.trace = Some(CalcTrace {
            recorder,
            btnu,
            btnd,
            function,
            sw,
            pulse,
            leds,
        });
        Ok(self)
    }

    /// Calls `observer` with every commit as it is checked.
    pub fn with_commit_observer(mut self, observer: &'a mut dyn FnMut(&CommitRecord)) -> Self {
        self.on_commit = Some(observer);
        self
    }

    /// Commits in the order they were checked.
    pub fn history(&self) -> &[CommitRecord] {
        &self.history
    }

    /// Ticks simulated so far.
    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    /// The design under test.
    pub fn dut(&self) -> &D {
        &self.dut
    }

    /// Clocks one edge with the current pins.
    fn step(&mut self) -> Result<(), VerifyError> {
        let leds = self.dut.leds();
        let pulse = self.dut.advance(&self.inputs);
        if let Some(trace) = &mut self.trace {
            let t = self.tick;
            trace.recorder.record(t, trace.btnu, &bit(self.inputs.btnu))?;
            trace.recorder.record(t, trace.btnd, &bit(self.inputs.btnd))?;
            trace.recorder.record(t, trace.function, &self.inputs.function())?;
            trace.recorder.record(t, trace.sw, &self.inputs.sw)?;
            trace.recorder.record(t, trace.pulse, &bit(pulse))?;
            trace.recorder.record(t, trace.leds, &leds)?;
        }
        self.tick += 1;
        Ok(())
    }

    /// Clocks one edge and requires the LEDs to hold.
    fn step_stable(&mut self, context: &str) -> Result<(), VerifyError> {
        let before = self.dut.leds();
        self.step()?;
        let after = self.dut.leds();
        self.scoreboard
            .check_stable(self.tick, "leds", &before, &after, context)
    }

    /// Holds reset for the commit latency and checks the LEDs cleared.
    ///
    /// The commit button stays released so the synchronizer and one-shot
    /// flush any unknown power-up state while reset is asserted.
    pub fn reset(&mut self) -> Result<(), VerifyError> {
        self.inputs.btnu = Logic::One;
        self.inputs.btnd = Logic::Zero;
        for _ in 0..COMMIT_LATENCY {
            self.step()?;
        }
        self.inputs.btnu = Logic::Zero;
        self.model.reset();
        let leds = self.dut.leds();
        self.scoreboard.check_word(
            self.tick,
            DiagnosticCode::VALUE_MISMATCH,
            "leds",
            &leds,
            self.model.expected(),
            "reset",
        )
    }

    fn drive(&mut self, vector: TestVector) -> Result<u8, VerifyError> {
        let select = function_select(vector.op).ok_or(VerifyError::UnreachableFunction(vector.op))?;
        self.inputs.select(vector.op);
        self.inputs.set_operand(vector.operand as u64);
        Ok(select)
    }

    /// Presses commit for one vector and checks the result.
    ///
    /// The LEDs must hold during setup and change at most once while the
    /// button is down and released.
    pub fn apply(&mut self, vector: TestVector) -> Result<(), VerifyError> {
        let select = self.drive(vector)?;
        let context = format!("{} 0x{:04X}", vector.op, vector.operand);
        for _ in 0..self.timing.setup {
            self.step_stable("setup")?;
        }

        let mut changes = 0usize;
        let mut last = self.dut.leds();
        self.inputs.btnd = Logic::One;
        for i in 0..self.timing.hold + self.timing.release {
            if i == self.timing.hold {
                self.inputs.btnd = Logic::Zero;
            }
            self.step()?;
            let now = self.dut.leds();
            if now != last {
                changes += 1;
                last = now;
            }
        }
        if changes > 1 {
            let diag = Diagnostic::error(
                DiagnosticCode::SPURIOUS_UPDATE,
                format!("leds changed {changes} times for one press of {context}"),
            )
            .with_help("a held commit button must update the accumulator exactly once");
            self.scoreboard.fail(self.tick, diag)?;
        }

        let expected = self.model.commit(select, vector.operand as u64);
        let leds = self.dut.leds();
        let record = CommitRecord {
            tick: self.tick,
            vector,
            leds: leds.to_u64(),
        };
        if let Some(observer) = &mut self.on_commit {
            observer(&record);
        }
        self.history.push(record);
        self.scoreboard.check_word(
            self.tick,
            DiagnosticCode::VALUE_MISMATCH,
            "leds",
            &leds,
            expected,
            &context,
        )
    }

    /// Changes switches and select without pressing commit.
    pub fn idle(&mut self, vector: TestVector) -> Result<(), VerifyError> {
        self.drive(vector)?;
        for _ in 0..self.timing.total() {
            self.step_stable("idle switch changes")?;
        }
        let leds = self.dut.leds();
        self.scoreboard.check_word(
            self.tick,
            DiagnosticCode::VALUE_MISMATCH,
            "leds",
            &leds,
            self.model.expected(),
            "idle switch changes",
        )
    }

    fn run_phases(&mut self) -> Result<(), VerifyError> {
        // Power-up outputs are unknown and the model is undefined until reset.
        let leds = self.dut.leds();
        self.scoreboard.check_word(
            self.tick,
            DiagnosticCode::VALUE_MISMATCH,
            "leds",
            &leds,
            self.model.expected(),
            "power-up",
        )?;
        self.reset()?;

        let directed = directed_vectors();
        for vector in &directed {
            self.apply(*vector)?;
        }

        let mut rng = StdRng::seed_from_u64(self.config.seed);
        let mut steps: Vec<Step> = random_vectors(&mut rng, self.config.random_per_op)
            .into_iter()
            .map(Step::Commit)
            .chain(
                idle_vectors(&mut rng, self.config.idle_events)
                    .into_iter()
                    .map(Step::Idle),
            )
            .collect();
        steps.shuffle(&mut rng);
        for step in steps {
            match step {
                Step::Commit(v) => self.apply(v)?,
                Step::Idle(v) => self.idle(v)?,
            }
        }

        for vector in &directed[..directed.len() / 2] {
            self.apply(*vector)?;
        }
        self.reset()?;
        for vector in &directed {
            self.apply(*vector)?;
        }
        Ok(())
    }

    /// Runs every phase and returns the report.
    ///
    /// Under the halt policy the first failure ends the run early; the
    /// report then has `halted` set.
    pub fn run(&mut self) -> Result<HarnessReport, VerifyError> {
        let halted = match self.run_phases() {
            Ok(()) => false,
            Err(VerifyError::Halted { .. }) => true,
            Err(e) => return Err(e),
        };
        if let Some(trace) = &mut self.trace {
            trace.recorder.finalize()?;
        }
        Ok(self.scoreboard.finish(self.tick, halted))
    }
}
