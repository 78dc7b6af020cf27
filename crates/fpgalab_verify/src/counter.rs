//! Testbench for the up/down button counter.

use fpgalab_common::Logic;
use fpgalab_config::CounterConfig;
use fpgalab_diagnostics::{DiagnosticCode, DiagnosticSink};
use fpgalab_sim::{ButtonCounter, CounterInputs, COMMIT_LATENCY, COUNTER_WIDTH};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::VerifyError;
use crate::model::CounterModel;
use crate::report::HarnessReport;
use crate::scoreboard::Scoreboard;

/// One randomized press.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum CounterEvent {
    /// Hold the given buttons for `hold` ticks, then release.
    Press {
        /// Count up.
        up: bool,
        /// Count down.
        down: bool,
        /// Ticks held.
        hold: u64,
    },
    /// Pulse the clear button for one tick.
    Clear,
}

/// Picks a random event; held lengths run from one tick to `max_hold`.
pub fn random_counter_event<R: Rng>(rng: &mut R, max_hold: u64) -> CounterEvent {
    let hold = rng.gen_range(1..=max_hold.max(1));
    match rng.gen_range(0..20) {
        0 => CounterEvent::Clear,
        1 | 2 => CounterEvent::Press {
            up: true,
            down: true,
            hold,
        },
        n if n % 2 == 0 => CounterEvent::Press {
            up: true,
            down: false,
            hold,
        },
        _ => CounterEvent::Press {
            up: false,
            down: true,
            hold,
        },
    }
}

/// Drives the counter with random presses and checks the count after each.
pub struct CounterHarness<'a> {
    dut: ButtonCounter,
    model: CounterModel,
    scoreboard: Scoreboard<'a>,
    presses: u32,
    max_hold: u64,
    seed: u64,
    tick: u64,
}

impl<'a> CounterHarness<'a> {
    /// Creates a harness around a fresh counter.
    pub fn new(
        config: &CounterConfig,
        seed: u64,
        period_ps: u64,
        halt_on_failure: bool,
        sink: &'a DiagnosticSink,
    ) -> Result<Self, VerifyError> {
        Ok(Self {
            dut: ButtonCounter::new(COUNTER_WIDTH)?,
            model: CounterModel::new(COUNTER_WIDTH),
            scoreboard: Scoreboard::new("counter", sink, period_ps, halt_on_failure),
            presses: config.presses,
            max_hold: config.max_hold_ticks as u64,
            seed,
            tick: 0,
        })
    }

    fn clock(&mut self, inputs: CounterInputs, ticks: u64) {
        for _ in 0..ticks {
            self.dut.advance(&inputs);
            self.tick += 1;
        }
    }

    fn check(&mut self, context: &str) -> Result<(), VerifyError> {
        let count = self.dut.count();
        self.scoreboard.check_word(
            self.tick,
            DiagnosticCode::COUNT_MISMATCH,
            "count",
            &count,
            self.model.expected(),
            context,
        )
    }

    fn apply(&mut self, event: CounterEvent) -> Result<(), VerifyError> {
        match event {
            CounterEvent::Clear => {
                let inputs = CounterInputs {
                    btnc: Logic::One,
                    ..CounterInputs::idle()
                };
                self.clock(inputs, 1);
                self.model.clear();
                self.check("clear")
            }
            CounterEvent::Press { up, down, hold } => {
                let inputs = CounterInputs {
                    btnu: up.into(),
                    btnd: down.into(),
                    btnc: Logic::Zero,
                };
                self.clock(inputs, hold);
                self.clock(CounterInputs::idle(), COMMIT_LATENCY);
                self.model.press(up, down);
                let context = match (up, down) {
                    (true, true) => format!("up and down held {hold} ticks"),
                    (true, false) => format!("up held {hold} ticks"),
                    _ => format!("down held {hold} ticks"),
                };
                self.check(&context)
            }
        }
    }

    fn run_events(&mut self) -> Result<(), VerifyError> {
        // Clear long enough to flush the synchronizers.
        let clear = CounterInputs {
            btnc: Logic::One,
            ..CounterInputs::idle()
        };
        self.clock(clear, COMMIT_LATENCY);
        self.model.clear();
        self.check("power-up clear")?;

        let mut rng = StdRng::seed_from_u64(self.seed);
        for _ in 0..self.presses {
            let event = random_counter_event(&mut rng, self.max_hold);
            self.apply(event)?;
        }
        Ok(())
    }

    /// Runs the configured number of presses.
    pub fn run(&mut self) -> Result<HarnessReport, VerifyError> {
        let halted = match self.run_events() {
            Ok(()) => false,
            Err(VerifyError::Halted { .. }) => true,
            Err(e) => return Err(e),
        };
        Ok(self.scoreboard.finish(self.tick, halted))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn behavioral_counter_passes() {
        let sink = DiagnosticSink::new();
        let config = CounterConfig::default();
        let report = CounterHarness::new(&config, 323, 10_000, false, &sink)
            .unwrap()
            .run()
            .unwrap();
        assert!(report.passed(), "{:?}", sink.diagnostics());
        assert_eq!(report.checks, config.presses as usize + 1);
    }

    #[test]
    fn event_mix() {
        let mut rng = StdRng::seed_from_u64(9);
        let events: Vec<_> = (0..400).map(|_| random_counter_event(&mut rng, 12)).collect();
        assert!(events.contains(&CounterEvent::Clear));
        assert!(events
            .iter()
            .any(|e| matches!(e, CounterEvent::Press { up: true, down: true, .. })));
        assert!(events.iter().all(|e| match e {
            CounterEvent::Press { hold, .. } => (1..=12).contains(hold),
            CounterEvent::Clear => true,
        }));
    }

    #[test]
    fn zero_max_hold_still_presses_one_tick() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..50 {
            if let CounterEvent::Press { hold, .. } = random_counter_event(&mut rng, 0) {
                assert_eq!(hold, 1);
            }
        }
    }
}
