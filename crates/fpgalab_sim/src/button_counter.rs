//! Up/down button counter.
//!
//! Each button line has its own synchronizer and one-shot, so holding a
//! button counts once. `btnc` clears the count synchronously.

use fpgalab_common::{Logic, LogicWord};

use crate::error::SimError;
use crate::oneshot::OneShot;
use crate::synchronizer::Synchronizer;

/// Counter width driving the LEDs.
pub const COUNTER_WIDTH: u32 = 16;

/// Input pins of the counter for one tick.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct CounterInputs {
    /// Count up (asynchronous).
    pub btnu: Logic,
    /// Count down (asynchronous).
    pub btnd: Logic,
    /// Synchronous clear.
    pub btnc: Logic,
}

impl CounterInputs {
    /// All buttons released.
    pub fn idle() -> Self {
        Self {
            btnu: Logic::Zero,
            btnd: Logic::Zero,
            btnc: Logic::Zero,
        }
    }
}

/// A channel from raw button level to single-tick pulse.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
struct ButtonChannel {
    sync: Synchronizer,
    edge: OneShot,
}

impl ButtonChannel {
    fn pulse(&self) -> Logic {
        self.edge.pulse(self.sync.output())
    }

    fn advance(&mut self, raw: Logic) {
        self.edge.advance(self.sync.output());
        self.sync.advance(raw);
    }
}

/// The counter register plus one button channel per direction.
///
/// When up and down pulse on the same edge, up wins.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct ButtonCounter {
    up: ButtonChannel,
    down: ButtonChannel,
    count: LogicWord,
}

impl ButtonCounter {
    /// Creates a counter of the given width in its power-up state.
    pub fn new(width: u32) -> Result<Self, SimError> {
        if !(1..=64).contains(&width) {
            return Err(SimError::WidthOutOfRange {
                width,
                min: 1,
                max: 64,
            });
        }
        Ok(Self {
            up: ButtonChannel::default(),
            down: ButtonChannel::default(),
            count: LogicWord::unknown(width),
        })
    }

    /// The current count.
    pub fn count(&self) -> LogicWord {
        self.count
    }

    fn next_count(&self, clear: Logic) -> LogicWord {
        let width = self.count.width();
        let step = |delta: u64| match self.count.to_u64() {
            Some(v) => LogicWord::from_u64(v.wrapping_add(delta), width),
            None => LogicWord::unknown(width),
        };
        match clear {
            Logic::One => return LogicWord::zero(width),
            Logic::X => return LogicWord::unknown(width),
            Logic::Zero => {}
        }
        match (self.up.pulse(), self.down.pulse()) {
            (Logic::One, _) => step(1),
            (Logic::X, _) => LogicWord::unknown(width),
            (Logic::Zero, Logic::One) => step(u64::MAX),
            (Logic::Zero, Logic::X) => LogicWord::unknown(width),
            (Logic::Zero, Logic::Zero) => self.count,
        }
    }

    /// Advances the counter by one edge.
    pub fn advance(&mut self, inputs: &CounterInputs) {
        self.count = self.next_count(inputs.btnc);
        self.up.advance(inputs.btnu);
        self.down.advance(inputs.btnd);
    }
}
