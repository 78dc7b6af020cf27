//! The button-driven accumulating calculator.
//!
//! Pin names follow the Basys3 board the lab targets: `btnu` is the
//! synchronous reset, `btnd` commits an operation, `btnl`/`btnc`/`btnr`
//! select the function and the sixteen switches carry the operand. The LEDs
//! show the accumulator.

use fpgalab_common::{Logic, LogicWord};
use serde::{Deserialize, Serialize};

use crate::alu::AluOp;
use crate::control::{function_select, ControlAction, ControlInputs, ControlUnit, FUNCTION_WIDTH};
use crate::error::SimError;
use crate::oneshot::OneShot;
use crate::synchronizer::{Synchronizer, SYNC_STAGES};

/// Edges between the commit button going high and the accumulator update:
/// two synchronizer stages, then the edge on which the pulse is sampled.
pub const COMMIT_LATENCY: u64 = SYNC_STAGES + 1;

/// The calculator's input pins for one tick.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct CalculatorInputs {
    /// Synchronous reset.
    pub btnu: Logic,
    /// Commit button (asynchronous).
    pub btnd: Logic,
    /// Function select bit 2.
    pub btnl: Logic,
    /// Function select bit 1.
    pub btnc: Logic,
    /// Function select bit 0.
    pub btnr: Logic,
    /// Operand switches.
    pub sw: LogicWord,
}

impl CalculatorInputs {
    /// All buttons released, switches at zero.
    pub fn idle(width: u32) -> Self {
        Self {
            btnu: Logic::Zero,
            btnd: Logic::Zero,
            btnl: Logic::Zero,
            btnc: Logic::Zero,
            btnr: Logic::Zero,
            sw: LogicWord::zero(width),
        }
    }

    /// Drives the select buttons for `op`.
    ///
    /// Returns `false`, leaving the buttons untouched, if the buttons cannot
    /// select `op`.
    pub fn select(&mut self, op: AluOp) -> bool {
        let Some(select) = function_select(op) else {
            return false;
        };
        self.btnl = Logic::from_bool(select & 0b100 != 0);
        self.btnc = Logic::from_bool(select & 0b010 != 0);
        self.btnr = Logic::from_bool(select & 0b001 != 0);
        true
    }

    /// Sets the switches to a known operand.
    pub fn set_operand(&mut self, operand: u64) {
        self.sw = LogicWord::from_u64(operand, self.sw.width());
    }

    /// The three select buttons as a bus, `btnl` most significant.
    pub fn function(&self) -> LogicWord {
        let mut bus = LogicWord::zero(FUNCTION_WIDTH);
        bus.set(2, self.btnl);
        bus.set(1, self.btnc);
        bus.set(0, self.btnr);
        bus
    }
}

/// What happened on one edge, for monitors and traces.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct CalculatorEdge {
    /// The commit pulse sampled on this edge.
    pub pulse: Logic,
    /// The control unit's transition.
    pub action: ControlAction,
}

/// Synchronizer, one-shot and control unit wired together.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Calculator {
    commit_sync: Synchronizer,
    commit_edge: OneShot,
    control: ControlUnit,
}

impl Calculator {
    /// Builds a calculator with a `width`-bit accumulator in its power-up state.
    pub fn new(width: u32) -> Result<Self, SimError> {
        Ok(Self {
            commit_sync: Synchronizer::new(),
            commit_edge: OneShot::new(),
            control: ControlUnit::new(width)?,
        })
    }

    /// Accumulator width in bits.
    pub fn width(&self) -> u32 {
        self.control.width()
    }

    /// The LED outputs.
    pub fn leds(&self) -> LogicWord {
        self.control.accumulator()
    }

    /// The commit pulse the next edge will sample.
    pub fn pending_pulse(&self) -> Logic {
        self.commit_edge.pulse(self.commit_sync.output())
    }

    /// Advances every register by one edge.
    ///
    /// All next states are computed from the current register outputs
    /// before any register is updated, so the order of the calls below does
    /// not matter.
    pub fn advance(&mut self, inputs: &CalculatorInputs) -> CalculatorEdge {
        let level = self.commit_sync.output();
        let pulse = self.commit_edge.pulse(level);
        let action = self.control.advance(&ControlInputs {
            reset: inputs.btnu,
            commit: pulse,
            function: inputs.function(),
            operand: inputs.sw,
        });
        self.commit_edge.advance(level);
        self.commit_sync.advance(inputs.btnd);
        CalculatorEdge { pulse, action }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::CALC_WIDTH;

    fn reset(calc: &mut Calculator) {
        let mut inp = CalculatorInputs::idle(CALC_WIDTH);
        inp.btnu = Logic::One;
        for _ in 0..COMMIT_LATENCY {
            calc.advance(&inp);
        }
    }

    fn press(calc: &mut Calculator, op: AluOp, operand: u64, hold: u64) -> usize {
        let mut inp = CalculatorInputs::idle(CALC_WIDTH);
        assert!(inp.select(op));
        inp.set_operand(operand);
        let mut updates = 0;
        inp.btnd = Logic::One;
        for _ in 0..hold {
            updates += matches!(calc.advance(&inp).action, ControlAction::Accumulate(_)) as usize;
        }
        inp.btnd = Logic::Zero;
        for _ in 0..COMMIT_LATENCY + 1 {
            updates += matches!(calc.advance(&inp).action, ControlAction::Accumulate(_)) as usize;
        }
        updates
    }

    #[test]
    fn reset_clears_unknowns() {
        let mut calc = Calculator::new(CALC_WIDTH).unwrap();
        assert!(calc.leds().is_all_unknown());
        reset(&mut calc);
        assert_eq!(calc.leds().to_u64(), Some(0));
        assert_eq!(calc.pending_pulse(), Logic::Zero);
    }

    #[test]
    fn update_lands_after_commit_latency() {
        let mut calc = Calculator::new(CALC_WIDTH).unwrap();
        reset(&mut calc);
        let mut inp = CalculatorInputs::idle(CALC_WIDTH);
        inp.select(AluOp::Add);
        inp.set_operand(5);
        inp.btnd = Logic::One;
        for edge in 1..=COMMIT_LATENCY {
            let out = calc.advance(&inp);
            let expect_pulse = edge == COMMIT_LATENCY;
            assert_eq!(out.pulse, Logic::from_bool(expect_pulse), "edge {edge}");
        }
        assert_eq!(calc.leds().to_u64(), Some(5));
    }

    #[test]
    fn long_hold_accumulates_once() {
        let mut calc = Calculator::new(CALC_WIDTH).unwrap();
        reset(&mut calc);
        assert_eq!(press(&mut calc, AluOp::Add, 3, 50), 1);
        assert_eq!(calc.leds().to_u64(), Some(3));
    }

    #[test]
    fn single_tick_press_still_counts() {
        let mut calc = Calculator::new(CALC_WIDTH).unwrap();
        reset(&mut calc);
        assert_eq!(press(&mut calc, AluOp::Add, 9, 1), 1);
        assert_eq!(calc.leds().to_u64(), Some(9));
    }

    #[test]
    fn select_reports_unreachable_op() {
        let mut inp = CalculatorInputs::idle(CALC_WIDTH);
        assert!(!inp.select(AluOp::Srl));
        assert!(inp.select(AluOp::Sra));
        assert_eq!(inp.function().to_u64(), Some(0b111));
    }

    #[test]
    fn switches_alone_do_nothing() {
        let mut calc = Calculator::new(CALC_WIDTH).unwrap();
        reset(&mut calc);
        let mut inp = CalculatorInputs::idle(CALC_WIDTH);
        for v in [1u64, 0xFFFF, 0x1234] {
            inp.set_operand(v);
            inp.select(AluOp::Or);
            assert_eq!(calc.advance(&inp).action, ControlAction::Hold);
        }
        assert_eq!(calc.leds().to_u64(), Some(0));
    }
}
