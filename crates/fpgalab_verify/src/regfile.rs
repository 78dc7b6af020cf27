//! Testbench for the two-read, one-write register file.

use std::collections::BTreeMap;

use fpgalab_common::LogicWord;
use fpgalab_config::RegfileConfig;
use fpgalab_diagnostics::{DiagnosticCode, DiagnosticSink};
use fpgalab_sim::{RegFile, RegFileInputs, RegisterFile, REG_COUNT};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::VerifyError;
use crate::report::HarnessReport;
use crate::scoreboard::Scoreboard;

/// Random register-file event.
///
/// Roughly a third of the read ports target the address being written so
/// same-tick forwarding is exercised, and register 0 is written often
/// enough to catch a design that lets it change.
pub fn random_event<R: Rng>(rng: &mut R) -> RegFileInputs {
    let write = rng.gen_bool(0.6);
    let write_addr = if rng.gen_bool(0.1) {
        0
    } else {
        rng.gen_range(0..REG_COUNT as u8)
    };
    let pick = |rng: &mut R| {
        if rng.gen_bool(0.35) {
            write_addr
        } else {
            rng.gen_range(0..REG_COUNT as u8)
        }
    };
    RegFileInputs {
        read_addr1: pick(rng),
        read_addr2: pick(rng),
        write,
        write_addr,
        write_data: rng.gen(),
    }
}

/// Drives a register file with random events against a shadow map.
pub struct RegfileHarness<'a, R: RegisterFile = RegFile> {
    dut: R,
    shadow: BTreeMap<u8, u32>,
    scoreboard: Scoreboard<'a>,
    events: u32,
    seed: u64,
}

impl<'a> RegfileHarness<'a, RegFile> {
    /// Creates a harness around the behavioral register file.
    pub fn new(
        config: &RegfileConfig,
        seed: u64,
        period_ps: u64,
        halt_on_failure: bool,
        sink: &'a DiagnosticSink,
    ) -> Self {
        Self::with_dut(RegFile::new(), config, seed, period_ps, halt_on_failure, sink)
    }
}

impl<'a, R: RegisterFile> RegfileHarness<'a, R> {
    /// Creates a harness around any register file.
    pub fn with_dut(
        dut: R,
        config: &RegfileConfig,
        seed: u64,
        period_ps: u64,
        halt_on_failure: bool,
        sink: &'a DiagnosticSink,
    ) -> Self {
        Self {
            dut,
            shadow: BTreeMap::new(),
            scoreboard: Scoreboard::new("regfile", sink, period_ps, halt_on_failure),
            events: config.events,
            seed,
        }
    }

    /// Expected read of `addr` this tick, `None` if never written.
    fn expected(&self, addr: u8, inputs: &RegFileInputs) -> Option<u64> {
        if addr == 0 {
            return Some(0);
        }
        if inputs.write && inputs.write_addr == addr {
            return Some(inputs.write_data as u64);
        }
        self.shadow.get(&addr).map(|v| *v as u64)
    }

    fn event(&mut self, tick: u64, inputs: &RegFileInputs) -> Result<(), VerifyError> {
        let reads = self.dut.read_ports(inputs)?;
        let addrs = [inputs.read_addr1, inputs.read_addr2];
        for (port, (addr, actual)) in addrs.into_iter().zip(reads).enumerate() {
            let expected = self.expected(addr, inputs);
            let context = if inputs.write {
                format!("read of x{addr} while writing 0x{:08X} to x{}", inputs.write_data, inputs.write_addr)
            } else {
                format!("read of x{addr}")
            };
            self.scoreboard.check_word(
                tick,
                DiagnosticCode::READ_MISMATCH,
                &format!("read port {}", port + 1),
                &LogicWord::from_u64(actual as u64, 32),
                expected,
                &context,
            )?;
        }
        self.dut.advance(inputs)?;
        if inputs.write && inputs.write_addr != 0 {
            self.shadow.insert(inputs.write_addr, inputs.write_data);
        }
        Ok(())
    }

    /// Applies the configured number of random events.
    pub fn run(&mut self) -> Result<HarnessReport, VerifyError> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut halted = false;
        let mut tick = 0;
        while tick < self.events as u64 {
            let inputs = random_event(&mut rng);
            match self.event(tick, &inputs) {
                Ok(()) => {}
                Err(VerifyError::Halted { .. }) => {
                    halted = true;
                    tick += 1;
                    break;
                }
                Err(e) => return Err(e),
            }
            tick += 1;
        }
        Ok(self.scoreboard.finish(tick, halted))
    }
}
