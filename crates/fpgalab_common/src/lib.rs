//! Shared foundational types for the fpgalab simulation core.
//!
//! Provides the three-state [`Logic`] bit, the fixed-width [`LogicWord`]
//! used for every bus and register, and clock [`Frequency`] values.

#![warn(missing_docs)]

pub mod frequency;
pub mod logic;
pub mod logic_word;

pub use frequency::{Frequency, ParseFrequencyError};
pub use logic::Logic;
pub use logic_word::LogicWord;
