//! Rising-edge one-shot.

use fpgalab_common::Logic;

/// Turns a held level into a single-tick pulse.
///
/// The pulse is combinational: `level AND NOT prev_level`, where
/// `prev_level` is the level registered on the previous edge. Holding the
/// level high yields one pulse; another pulse needs the level to drop back
/// to zero first.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OneShot {
    prev_level: Logic,
}

impl OneShot {
    /// Creates a one-shot in its power-up state.
    pub fn new() -> Self {
        Self {
            prev_level: Logic::X,
        }
    }

    /// The pulse this tick for the given synchronized level.
    pub fn pulse(&self, level: Logic) -> Logic {
        level & !self.prev_level
    }

    /// Returns the state after one edge.
    pub fn next(&self, level: Logic) -> Self {
        Self { prev_level: level }
    }

    /// Computes this tick's pulse and clocks the edge register.
    pub fn advance(&mut self, level: Logic) -> Logic {
        let pulse = self.pulse(level);
        *self = self.next(level);
        pulse
    }
}

impl Default for OneShot {
    fn default() -> Self {
        Self::new()
    }
}
