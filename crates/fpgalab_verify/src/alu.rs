//! Testbench for the combinational ALU.
//!
//! Every 4-bit control code is exercised, documented or not. Documented
//! codes are checked against [`reference_alu`]; the others get one coverage
//! note each and their outputs are not asserted.

use fpgalab_common::{Logic, LogicWord};
use fpgalab_config::AluConfig;
use fpgalab_diagnostics::{Diagnostic, DiagnosticCode, DiagnosticSink};
use fpgalab_sim::{evaluate_code, evaluate_word, AluOp, ALU_WIDTH};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::VerifyError;
use crate::model::{reference_alu, Expected};
use crate::report::HarnessReport;
use crate::scoreboard::Scoreboard;

/// Operand pairs applied to every control code before the random ones.
pub const DIRECTED_PAIRS: [(u32, u32); 12] = [
    (0, 0),
    (1, 1),
    (5, 5),
    (0xFFFF_FFFF, 1),
    (0x8000_0000, 0x7FFF_FFFF),
    (0x7FFF_FFFF, 0x8000_0000),
    (0xFFFF_0000, 1),
    (0x8000_0000, 31),
    (1, 31),
    (0xDEAD_BEEF, 0),
    (0x1234_5678, 0xFFFF_FFE4),
    (0x0F0F_0F0F, 0xF0F0_F0F0),
];

type AluDesign<'a> = Box<dyn Fn(u32, u32, u8) -> (LogicWord, Logic) + 'a>;

/// The behavioral ALU seen through its 4-state interface.
///
/// Documented codes go through [`evaluate_word`]; undefined codes take the
/// raw decode path of [`evaluate_code`].
pub fn behavioral_alu(a: u32, b: u32, code: u8) -> (LogicWord, Logic) {
    match AluOp::decode(code) {
        Some(op) => evaluate_word(
            &LogicWord::from_u64(a as u64, ALU_WIDTH),
            &LogicWord::from_u64(b as u64, ALU_WIDTH),
            op,
        ),
        None => {
            let out = evaluate_code(a, b, code);
            (
                LogicWord::from_u64(out.result as u64, ALU_WIDTH),
                Logic::from_bool(out.zero),
            )
        }
    }
}

/// Drives an ALU design through every control code.
pub struct AluHarness<'a> {
    design: AluDesign<'a>,
    scoreboard: Scoreboard<'a>,
    random_per_code: u32,
    seed: u64,
    vectors: u64,
}

impl<'a> AluHarness<'a> {
    /// Creates a harness around the behavioral ALU.
    pub fn new(config: &AluConfig, seed: u64, halt_on_failure: bool, sink: &'a DiagnosticSink) -> Self {
        Self::with_design(behavioral_alu, config, seed, halt_on_failure, sink)
    }

    /// Creates a harness around any function of `(a, b, code)`.
    pub fn with_design(
        design: impl Fn(u32, u32, u8) -> (LogicWord, Logic) + 'a,
        config: &AluConfig,
        seed: u64,
        halt_on_failure: bool,
        sink: &'a DiagnosticSink,
    ) -> Self {
        Self {
            design: Box::new(design),
            // Vectors are not clocked; the stamp tick is the vector index.
            scoreboard: Scoreboard::new("alu", sink, 0, halt_on_failure),
            random_per_code: config.random_per_op,
            seed,
            vectors: 0,
        }
    }

    fn check(&mut self, a: u32, b: u32, code: u8, expected: u32) -> Result<(), VerifyError> {
        let (result, zero) = (self.design)(a, b, code);
        let tick = self.vectors;
        let context = format!("code 0b{code:04b} with a=0x{a:08X} b=0x{b:08X}");
        self.scoreboard.check_word(
            tick,
            DiagnosticCode::VALUE_MISMATCH,
            "result",
            &result,
            Some(expected as u64),
            &context,
        )?;
        let mut zero_word = LogicWord::zero(1);
        zero_word.set(0, zero);
        self.scoreboard.check_word(
            tick,
            DiagnosticCode::VALUE_MISMATCH,
            "zero",
            &zero_word,
            Some((expected == 0) as u64),
            &context,
        )
    }

    fn run_code(&mut self, code: u8, rng: &mut StdRng) -> Result<(), VerifyError> {
        let mut pairs = DIRECTED_PAIRS.to_vec();
        pairs.extend((0..self.random_per_code).map(|_| (rng.gen::<u32>(), rng.gen::<u32>())));

        let mut noted = false;
        for (a, b) in pairs {
            match reference_alu(a, b, code) {
                Expected::Value(v) => self.check(a, b, code, v)?,
                Expected::Unspecified if !noted => {
                    let (result, _) = (self.design)(a, b, code);
                    self.scoreboard.note(
                        self.vectors,
                        Diagnostic::note(
                            DiagnosticCode::UNSPECIFIED_OPCODE,
                            format!("control code 0b{code:04b} has no documented operation"),
                        )
                        .with_note(format!(
                            "design returned {} for a=0x{a:08X} b=0x{b:08X}",
                            result.to_hex_string()
                        )),
                    );
                    noted = true;
                }
                Expected::Unspecified => {}
            }
            self.vectors += 1;
        }
        Ok(())
    }

    /// Runs every control code and returns the report.
    pub fn run(&mut self) -> Result<HarnessReport, VerifyError> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut halted = false;
        for code in 0..16u8 {
            match self.run_code(code, &mut rng) {
                Ok(()) => {}
                Err(VerifyError::Halted { .. }) => {
                    halted = true;
                    break;
                }
                Err(e) => return Err(e),
            }
        }
        Ok(self.scoreboard.finish(self.vectors, halted))
    }
}
