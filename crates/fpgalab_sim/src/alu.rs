//! The 32-bit, nine-operation ALU.
//!
//! Opcodes use the 4-bit encoding of the RISC-V datapath labs. The ALU is a
//! pure function: [`evaluate`] for known operands, [`evaluate_code`] for a
//! raw 4-bit control field, and [`evaluate_word`] for operands that may
//! carry unknown bits.

use fpgalab_common::{Logic, LogicWord};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Width of the ALU datapath.
pub const ALU_WIDTH: u32 = 32;

/// One of the nine defined ALU operations.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum AluOp {
    /// Bitwise AND.
    And,
    /// Bitwise OR.
    Or,
    /// Wrapping addition.
    Add,
    /// Wrapping subtraction.
    Sub,
    /// Signed less-than, 1 or 0.
    Slt,
    /// Logical shift right.
    Srl,
    /// Logical shift left.
    Sll,
    /// Arithmetic shift right.
    Sra,
    /// Bitwise XOR.
    Xor,
}

impl AluOp {
    /// Every defined operation, in opcode order.
    pub const ALL: [AluOp; 9] = [
        AluOp::And,
        AluOp::Or,
        AluOp::Add,
        AluOp::Sub,
        AluOp::Slt,
        AluOp::Srl,
        AluOp::Sll,
        AluOp::Sra,
        AluOp::Xor,
    ];

    /// The 4-bit control code.
    pub fn code(self) -> u8 {
        match self {
            AluOp::And => 0b0000,
            AluOp::Or => 0b0001,
            AluOp::Add => 0b0010,
            AluOp::Sub => 0b0110,
            AluOp::Slt => 0b0111,
            AluOp::Srl => 0b1000,
            AluOp::Sll => 0b1001,
            AluOp::Sra => 0b1010,
            AluOp::Xor => 0b1101,
        }
    }

    /// Decodes a 4-bit control code. Undefined codes return `None`.
    pub fn decode(code: u8) -> Option<AluOp> {
        AluOp::ALL.into_iter().find(|op| op.code() == code & 0xF)
    }

    /// Short upper-case mnemonic.
    pub fn mnemonic(self) -> &'static str {
        match self {
            AluOp::And => "AND",
            AluOp::Or => "OR",
            AluOp::Add => "ADD",
            AluOp::Sub => "SUB",
            AluOp::Slt => "SLT",
            AluOp::Srl => "SRL",
            AluOp::Sll => "SLL",
            AluOp::Sra => "SRA",
            AluOp::Xor => "XOR",
        }
    }
}

impl fmt::Display for AluOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.mnemonic())
    }
}

/// Result and zero flag.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct AluOutput {
    /// The 32-bit result.
    pub result: u32,
    /// Set when `result == 0`.
    pub zero: bool,
}

/// Computes `op` on two known operands.
pub fn evaluate(a: u32, b: u32, op: AluOp) -> AluOutput {
    let shamt = b & 0x1F;
    let result = match op {
        AluOp::And => a & b,
        AluOp::Or => a | b,
        AluOp::Add => a.wrapping_add(b),
        AluOp::Sub => a.wrapping_sub(b),
        AluOp::Slt => ((a as i32) < (b as i32)) as u32,
        AluOp::Srl => a >> shamt,
        AluOp::Sll => a << shamt,
        AluOp::Sra => ((a as i32) >> shamt) as u32,
        AluOp::Xor => a ^ b,
    };
    AluOutput {
        result,
        zero: result == 0,
    }
}

/// Computes a raw 4-bit control code. Undefined codes behave as ADD.
pub fn evaluate_code(a: u32, b: u32, code: u8) -> AluOutput {
    evaluate(a, b, AluOp::decode(code).unwrap_or(AluOp::Add))
}

/// Computes `op` on 32-bit operands that may contain unknown bits.
///
/// Bitwise operations keep whatever bits stay determined (`0 & X = 0`).
/// Arithmetic, comparison and shifts need every input bit, so any unknown
/// operand bit makes the whole result unknown. The zero flag is known as
/// soon as one result bit is a known one.
///
/// # Panics
///
/// Panics if either operand is not [`ALU_WIDTH`] bits wide.
pub fn evaluate_word(a: &LogicWord, b: &LogicWord, op: AluOp) -> (LogicWord, Logic) {
    assert_eq!(a.width(), ALU_WIDTH, "ALU operand A must be 32 bits");
    assert_eq!(b.width(), ALU_WIDTH, "ALU operand B must be 32 bits");
    let result = match op {
        AluOp::And => a & b,
        AluOp::Or => a | b,
        AluOp::Xor => a ^ b,
        _ => match (a.to_u64(), b.to_u64()) {
            (Some(a), Some(b)) => {
                let out = evaluate(a as u32, b as u32, op);
                LogicWord::from_u64(out.result as u64, ALU_WIDTH)
            }
            _ => LogicWord::unknown(ALU_WIDTH),
        },
    };
    (result, zero_flag(&result))
}

fn zero_flag(result: &LogicWord) -> Logic {
    if let Some(v) = result.to_u64() {
        return Logic::from_bool(v == 0);
    }
    if (0..result.width()).any(|i| result.get(i) == Logic::One) {
        Logic::Zero
    } else {
        Logic::X
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_roundtrip() {
        for op in AluOp::ALL {
            assert_eq!(AluOp::decode(op.code()), Some(op));
        }
    }

    #[test]
    fn undefined_codes() {
        let undefined: Vec<u8> = (0..16).filter(|c| AluOp::decode(*c).is_none()).collect();
        assert_eq!(undefined, vec![3, 4, 5, 11, 12, 14, 15]);
    }

    #[test]
    fn add_sub_wrap() {
        assert_eq!(evaluate(u32::MAX, 1, AluOp::Add).result, 0);
        assert!(evaluate(u32::MAX, 1, AluOp::Add).zero);
        assert_eq!(evaluate(0, 1, AluOp::Sub).result, u32::MAX);
    }

    #[test]
    fn slt_is_signed() {
        assert_eq!(evaluate(0xFFFF_FFFF, 0, AluOp::Slt).result, 1);
        assert_eq!(evaluate(0, 0xFFFF_FFFF, AluOp::Slt).result, 0);
        assert_eq!(evaluate(3, 3, AluOp::Slt).result, 0);
        assert_eq!(evaluate(0x8000_0000, 0x7FFF_FFFF, AluOp::Slt).result, 1);
    }

    #[test]
    fn shifts_use_low_five_bits() {
        assert_eq!(evaluate(1, 33, AluOp::Sll).result, 2);
        assert_eq!(evaluate(0x8000_0000, 31, AluOp::Srl).result, 1);
        assert_eq!(evaluate(0x8000_0000, 32, AluOp::Srl).result, 0x8000_0000);
    }

    #[test]
    fn sra_sign_extends() {
        assert_eq!(evaluate(0xFFFF_0000, 1, AluOp::Sra).result, 0xFFFF_8000);
        assert_eq!(evaluate(0x7FFF_0000, 4, AluOp::Sra).result, 0x07FF_F000);
    }

    #[test]
    fn bitwise() {
        assert_eq!(evaluate(0xF0F0, 0xFF00, AluOp::And).result, 0xF000);
        assert_eq!(evaluate(0xF0F0, 0xFF00, AluOp::Or).result, 0xFFF0);
        assert_eq!(evaluate(0xF0F0, 0xFF00, AluOp::Xor).result, 0x0FF0);
    }

    #[test]
    fn undefined_code_is_add() {
        assert_eq!(evaluate_code(5, 7, 0b1111), evaluate(5, 7, AluOp::Add));
        assert_eq!(evaluate_code(5, 7, 0b0110), evaluate(5, 7, AluOp::Sub));
    }

    #[test]
    fn word_known_operands_match_integer_alu() {
        let a = LogicWord::from_u64(0xFFFF_0000, 32);
        let b = LogicWord::from_u64(1, 32);
        let (r, z) = evaluate_word(&a, &b, AluOp::Sra);
        assert_eq!(r.to_u64(), Some(0xFFFF_8000));
        assert_eq!(z, Logic::Zero);
    }

    #[test]
    fn word_and_keeps_known_zeros() {
        let a = LogicWord::unknown(32);
        let b = LogicWord::zero(32);
        let (r, z) = evaluate_word(&a, &b, AluOp::And);
        assert_eq!(r.to_u64(), Some(0));
        assert_eq!(z, Logic::One);
    }

    #[test]
    fn word_arithmetic_with_unknown_is_unknown() {
        let mut a = LogicWord::from_u64(1, 32);
        a.set(7, Logic::X);
        let b = LogicWord::from_u64(1, 32);
        let (r, z) = evaluate_word(&a, &b, AluOp::Add);
        assert!(r.is_all_unknown());
        assert_eq!(z, Logic::X);
    }

    #[test]
    fn word_or_with_known_one_has_known_zero_flag() {
        let a = LogicWord::unknown(32);
        let b = LogicWord::from_u64(0x10, 32);
        let (_, z) = evaluate_word(&a, &b, AluOp::Or);
        assert_eq!(z, Logic::Zero);
    }

    #[test]
    fn display_mnemonic() {
        assert_eq!(AluOp::Sra.to_string(), "SRA");
    }
}
