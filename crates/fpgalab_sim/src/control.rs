//! Accumulator register and the control logic that updates it.

use fpgalab_common::{Logic, LogicWord};
use serde::{Deserialize, Serialize};

use crate::alu::{self, AluOp, ALU_WIDTH};
use crate::error::SimError;

/// Accumulator width of the calculator design.
pub const CALC_WIDTH: u32 = 16;

/// Width of the function-select bus (three buttons).
pub const FUNCTION_WIDTH: u32 = 3;

/// Operations reachable from the function-select buttons, indexed by the
/// 3-bit select value `{btnl, btnc, btnr}`.
pub const FUNCTION_TABLE: [AluOp; 8] = [
    AluOp::Add,
    AluOp::Sub,
    AluOp::And,
    AluOp::Or,
    AluOp::Xor,
    AluOp::Slt,
    AluOp::Sll,
    AluOp::Sra,
];

/// Decodes a 3-bit function select into an ALU operation.
pub fn decode_function(select: u8) -> AluOp {
    FUNCTION_TABLE[(select & 0b111) as usize]
}

/// The select value that chooses `op`, or `None` for operations the
/// buttons cannot reach (SRL).
pub fn function_select(op: AluOp) -> Option<u8> {
    FUNCTION_TABLE
        .iter()
        .position(|candidate| *candidate == op)
        .map(|i| i as u8)
}

/// What the control unit does on a given edge.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum ControlAction {
    /// Synchronous reset: the accumulator clears.
    Reset,
    /// A qualifying pulse: the accumulator takes the ALU result.
    Accumulate(AluOp),
    /// Nothing asserted: the accumulator holds.
    Hold,
    /// The pulse or function select is unknown; so is the next value.
    Unknown,
}

/// Inputs the control unit samples on each edge.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct ControlInputs {
    /// Synchronous reset.
    pub reset: Logic,
    /// Single-tick commit pulse from the one-shot.
    pub commit: Logic,
    /// 3-bit function select.
    pub function: LogicWord,
    /// Operand bus, as wide as the accumulator.
    pub operand: LogicWord,
}

/// The accumulator register plus its next-state logic.
///
/// The register powers up unknown. Reset dominates every other input; a
/// commit pulse replaces the value with
/// `ALU(sign_extend(acc), sign_extend(operand), decode(function))`
/// truncated back to the register width; otherwise the value holds.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct ControlUnit {
    accumulator: LogicWord,
}

impl ControlUnit {
    /// Creates a control unit with a `width`-bit accumulator.
    pub fn new(width: u32) -> Result<Self, SimError> {
        if !(1..=ALU_WIDTH).contains(&width) {
            return Err(SimError::WidthOutOfRange {
                width,
                min: 1,
                max: ALU_WIDTH,
            });
        }
        Ok(Self {
            accumulator: LogicWord::unknown(width),
        })
    }

    /// Current accumulator value.
    pub fn accumulator(&self) -> LogicWord {
        self.accumulator
    }

    /// Accumulator width in bits.
    pub fn width(&self) -> u32 {
        self.accumulator.width()
    }

    /// Decides which transition the next edge takes.
    pub fn action(&self, inputs: &ControlInputs) -> ControlAction {
        match inputs.reset {
            Logic::One => return ControlAction::Reset,
            Logic::X => return ControlAction::Unknown,
            Logic::Zero => {}
        }
        match inputs.commit {
            Logic::Zero => ControlAction::Hold,
            Logic::X => ControlAction::Unknown,
            Logic::One => match inputs.function.to_u64() {
                Some(select) => ControlAction::Accumulate(decode_function(select as u8)),
                None => ControlAction::Unknown,
            },
        }
    }

    /// Returns the accumulator value after the next edge.
    pub fn next(&self, inputs: &ControlInputs) -> LogicWord {
        let width = self.width();
        match self.action(inputs) {
            ControlAction::Reset => LogicWord::zero(width),
            ControlAction::Hold => self.accumulator,
            ControlAction::Unknown => LogicWord::unknown(width),
            ControlAction::Accumulate(op) => {
                let a = self.accumulator.sign_extend(ALU_WIDTH);
                let b = inputs.operand.sign_extend(ALU_WIDTH);
                let (result, _zero) = alu::evaluate_word(&a, &b, op);
                result.truncate(width)
            }
        }
    }

    /// Clocks the accumulator once and returns the action taken.
    pub fn advance(&mut self, inputs: &ControlInputs) -> ControlAction {
        let action = self.action(inputs);
        self.accumulator = self.next(inputs);
        action
    }
}
