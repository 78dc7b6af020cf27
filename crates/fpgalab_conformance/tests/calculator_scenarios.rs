//! Cycle-level scenarios for the calculator: the documented sequence,
//! commit latency, reset behavior and unknown-value handling.

use fpgalab_common::{Logic, LogicWord};
use fpgalab_conformance::{commit, hold_reset, press, reset_calculator};
use fpgalab_sim::{
    AluOp, Calculator, CalculatorInputs, ControlAction, Synchronizer, CALC_WIDTH,
    COMMIT_LATENCY, SYNC_STAGES,
};

#[test]
fn documented_sequence() {
    let mut calc = reset_calculator();
    assert_eq!(calc.leds().to_u64(), Some(0));
    assert_eq!(commit(&mut calc, AluOp::Add, 0xFFF3), Some(0xFFF3));
    assert_eq!(commit(&mut calc, AluOp::Sub, 0xFFF0), Some(0x0003));
    assert_eq!(commit(&mut calc, AluOp::Slt, 0x0000), Some(0x0000));
    assert_eq!(commit(&mut calc, AluOp::And, 0x00FF), Some(0x0000));
}

#[test]
fn signed_compare_on_sign_extended_operands() {
    let mut calc = reset_calculator();
    // -1 < 0
    commit(&mut calc, AluOp::Add, 0xFFFF);
    assert_eq!(commit(&mut calc, AluOp::Slt, 0x0000), Some(1));
    // 1 < -32768 is false
    assert_eq!(commit(&mut calc, AluOp::Slt, 0x8000), Some(0));
}

#[test]
fn arithmetic_shift_keeps_sign() {
    let mut calc = reset_calculator();
    commit(&mut calc, AluOp::Or, 0x8000);
    assert_eq!(commit(&mut calc, AluOp::Sra, 4), Some(0xF800));
    assert_eq!(commit(&mut calc, AluOp::Sra, 31), Some(0xFFFF));
}

#[test]
fn shift_left_past_sixteen_bits_truncates() {
    let mut calc = reset_calculator();
    commit(&mut calc, AluOp::Add, 0x00FF);
    assert_eq!(commit(&mut calc, AluOp::Sll, 8), Some(0xFF00));
    assert_eq!(commit(&mut calc, AluOp::Sll, 16), Some(0x0000));
}

#[test]
fn update_lands_exactly_commit_latency_after_press() {
    let mut calc = reset_calculator();
    let mut inputs = CalculatorInputs::idle(CALC_WIDTH);
    inputs.select(AluOp::Add);
    inputs.set_operand(0x0042);
    inputs.btnd = Logic::One;
    for edge in 1..COMMIT_LATENCY {
        calc.advance(&inputs);
        assert_eq!(calc.leds().to_u64(), Some(0), "edge {edge}");
    }
    let out = calc.advance(&inputs);
    assert_eq!(out.action, ControlAction::Accumulate(AluOp::Add));
    assert_eq!(calc.leds().to_u64(), Some(0x0042));
}

#[test]
fn operand_sampled_on_pulse_edge() {
    let mut calc = reset_calculator();
    let mut inputs = CalculatorInputs::idle(CALC_WIDTH);
    inputs.select(AluOp::Add);
    inputs.set_operand(1);
    inputs.btnd = Logic::One;
    for _ in 0..COMMIT_LATENCY - 1 {
        calc.advance(&inputs);
    }
    // Switches change just before the pulse edge; the new value is used.
    inputs.set_operand(7);
    calc.advance(&inputs);
    assert_eq!(calc.leds().to_u64(), Some(7));
}

#[test]
fn long_hold_updates_once() {
    let mut calc = reset_calculator();
    let out = press(&mut calc, AluOp::Add, 5, 200, COMMIT_LATENCY);
    assert_eq!(out.updates, 1);
    assert_eq!(out.leds.to_u64(), Some(5));
}

#[test]
fn back_to_back_presses_each_count() {
    let mut calc = reset_calculator();
    // Two-tick presses are shorter than the latency, so each update lands
    // during the following press.
    let mut updates = 0;
    for _ in 0..10 {
        updates += press(&mut calc, AluOp::Add, 1, 1, 1).updates;
    }
    let idle = CalculatorInputs::idle(CALC_WIDTH);
    for _ in 0..COMMIT_LATENCY {
        if matches!(calc.advance(&idle).action, ControlAction::Accumulate(_)) {
            updates += 1;
        }
    }
    assert_eq!(updates, 10);
    assert_eq!(calc.leds().to_u64(), Some(10));
}

#[test]
fn power_up_is_unknown_until_reset() {
    let mut calc = Calculator::new(CALC_WIDTH).unwrap();
    assert!(calc.leds().is_all_unknown());
    // Clocking without reset keeps the accumulator unknown.
    let idle = CalculatorInputs::idle(CALC_WIDTH);
    for _ in 0..10 {
        calc.advance(&idle);
    }
    assert!(!calc.leds().is_known());
    hold_reset(&mut calc, 1);
    assert_eq!(calc.leds().to_u64(), Some(0));
}

#[test]
fn reset_dominates_a_coincident_commit() {
    let mut calc = reset_calculator();
    commit(&mut calc, AluOp::Add, 0x1234);
    let mut inputs = CalculatorInputs::idle(CALC_WIDTH);
    inputs.select(AluOp::Add);
    inputs.set_operand(1);
    inputs.btnd = Logic::One;
    for _ in 0..COMMIT_LATENCY - 1 {
        calc.advance(&inputs);
    }
    inputs.btnu = Logic::One;
    assert_eq!(calc.pending_pulse(), Logic::One);
    assert_eq!(calc.advance(&inputs).action, ControlAction::Reset);
    assert_eq!(calc.leds().to_u64(), Some(0));
}

#[test]
fn reset_dominates_an_unknown_pulse() {
    // Right after power-up the one-shot output is unknown.
    let mut calc = Calculator::new(CALC_WIDTH).unwrap();
    assert_eq!(calc.pending_pulse(), Logic::X);
    hold_reset(&mut calc, 1);
    assert_eq!(calc.leds().to_u64(), Some(0));
}

#[test]
fn unknown_commit_line_poisons_the_accumulator() {
    let mut calc = reset_calculator();
    let mut inputs = CalculatorInputs::idle(CALC_WIDTH);
    inputs.btnd = Logic::X;
    for _ in 0..COMMIT_LATENCY {
        calc.advance(&inputs);
    }
    assert!(!calc.leds().is_known());
    hold_reset(&mut calc, COMMIT_LATENCY);
    assert_eq!(calc.leds().to_u64(), Some(0));
}

#[test]
fn synchronizer_delays_by_two_edges() {
    let mut sync = Synchronizer::new();
    let pattern = [true, false, false, true, true, false, true];
    let mut seen = Vec::new();
    for level in pattern {
        sync.advance(Logic::from_bool(level));
        seen.push(sync.output());
    }
    assert_eq!(seen[0], Logic::X);
    for i in SYNC_STAGES as usize - 1..pattern.len() {
        assert_eq!(seen[i], Logic::from_bool(pattern[i + 1 - SYNC_STAGES as usize]));
    }
}

#[test]
fn switches_and_select_without_commit_hold_value() {
    let mut calc = reset_calculator();
    commit(&mut calc, AluOp::Add, 0x00AA);
    let mut inputs = CalculatorInputs::idle(CALC_WIDTH);
    for (op, v) in [(AluOp::Xor, 0xFFFF), (AluOp::Sub, 0x0001), (AluOp::Sll, 0x000F)] {
        inputs.select(op);
        inputs.set_operand(v);
        for _ in 0..5 {
            assert_eq!(calc.advance(&inputs).action, ControlAction::Hold);
        }
    }
    assert_eq!(calc.leds(), LogicWord::from_u64(0x00AA, CALC_WIDTH));
}
