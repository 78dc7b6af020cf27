//! Diagnostic codes with category prefixes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The category of a diagnostic code, determining its prefix letter.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum Category {
    /// Check failures, prefixed with `E`.
    Check,
    /// Stimulus problems, prefixed with `W`.
    Stimulus,
    /// Coverage notes, prefixed with `N`.
    Coverage,
}

impl Category {
    /// Returns the single-character prefix for this category.
    pub fn prefix(self) -> char {
        match self {
            Category::Check => 'E',
            Category::Stimulus => 'W',
            Category::Coverage => 'N',
        }
    }
}

/// A category prefix plus a number, displayed as e.g. `E101`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct DiagnosticCode {
    /// The category of this diagnostic.
    pub category: Category,
    /// The numeric identifier within the category.
    pub number: u16,
}

impl DiagnosticCode {
    /// DUT output differs from the reference model.
    pub const VALUE_MISMATCH: Self = Self::new(Category::Check, 101);
    /// A monitored signal is unknown at a sampling point.
    pub const UNKNOWN_VALUE: Self = Self::new(Category::Check, 102);
    /// The accumulator changed on a tick without a commit pulse.
    pub const SPURIOUS_UPDATE: Self = Self::new(Category::Check, 103);
    /// A register-file read port returned the wrong data.
    pub const READ_MISMATCH: Self = Self::new(Category::Check, 104);
    /// The button counter disagrees with the reference count.
    pub const COUNT_MISMATCH: Self = Self::new(Category::Check, 105);
    /// An opcode outside the defined set was exercised.
    pub const UNSPECIFIED_OPCODE: Self = Self::new(Category::Coverage, 201);
    /// A button press is shorter than the synchronizer latency.
    pub const SHORT_PRESS: Self = Self::new(Category::Stimulus, 301);

    /// Creates a new diagnostic code.
    pub const fn new(category: Category, number: u16) -> Self {
        Self { category, number }
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:03}", self.category.prefix(), self.number)
    }
}
