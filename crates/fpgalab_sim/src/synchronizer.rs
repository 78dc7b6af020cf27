//! Two-flop synchronizer for asynchronous inputs.

use fpgalab_common::Logic;

/// Number of flip-flops in the chain, and so the latency in ticks.
pub const SYNC_STAGES: u64 = 2;

/// A two-stage flip-flop chain bringing one asynchronous line into the
/// clock domain.
///
/// On every edge `stage1` samples the raw input and `stage2` samples
/// `stage1`. Only `stage2` is trusted downstream, so the synchronized level
/// lags the raw input by exactly [`SYNC_STAGES`] ticks. Both flops power up
/// unknown and there is no reset; they fill from the input instead.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Synchronizer {
    stage1: Logic,
    stage2: Logic,
}

impl Synchronizer {
    /// Creates a synchronizer in its power-up state.
    pub fn new() -> Self {
        Self {
            stage1: Logic::X,
            stage2: Logic::X,
        }
    }

    /// Returns the state after one edge with `raw` at the input.
    pub fn next(&self, raw: Logic) -> Self {
        Self {
            stage1: raw,
            stage2: self.stage1,
        }
    }

    /// Clocks the chain once.
    pub fn advance(&mut self, raw: Logic) {
        *self = self.next(raw);
    }

    /// The synchronized level.
    pub fn output(&self) -> Logic {
        self.stage2
    }
}

impl Default for Synchronizer {
    fn default() -> Self {
        Self::new()
    }
}
