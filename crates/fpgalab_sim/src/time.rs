//! The global logical clock.
//!
//! Every model in this crate advances exactly one step per rising edge. The
//! [`Clock`] counts those edges and converts the count into picoseconds for
//! reports and waveform dumps.

use fpgalab_common::Frequency;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Counts rising clock edges.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Clock {
    tick: u64,
    period_ps: u64,
}

impl Clock {
    /// Creates a clock at tick zero running at `frequency`.
    pub fn new(frequency: Frequency) -> Self {
        Self {
            tick: 0,
            period_ps: frequency.period_ps().max(1),
        }
    }

    /// Number of rising edges seen so far.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Length of one tick in picoseconds.
    pub fn period_ps(&self) -> u64 {
        self.period_ps
    }

    /// Wall-clock time of the current tick in picoseconds.
    pub fn time_ps(&self) -> u64 {
        self.tick.saturating_mul(self.period_ps)
    }

    /// Advances past one rising edge.
    pub fn advance(&mut self) {
        self.tick += 1;
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new(Frequency::BOARD_CLOCK)
    }
}

impl fmt::Display for Clock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tick {} @ {} ps", self.tick, self.time_ps())
    }
}
