//! Simulation-time stamps attached to diagnostics.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The tick a diagnostic refers to, plus its wall-clock equivalent.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct TickStamp {
    /// Number of clock edges since the start of the run.
    pub tick: u64,
    /// `tick` multiplied by the clock period, in picoseconds.
    pub time_ps: u64,
}

impl TickStamp {
    /// Creates a stamp for `tick` given a clock period.
    pub fn new(tick: u64, period_ps: u64) -> Self {
        Self {
            tick,
            time_ps: tick.saturating_mul(period_ps),
        }
    }
}

impl fmt::Display for TickStamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.time_ps % 1_000 == 0 {
            write!(f, "tick {} ({} ns)", self.tick, self.time_ps / 1_000)
        } else {
            write!(f, "tick {} ({} ps)", self.tick, self.time_ps)
        }
    }
}
