//! Run summaries.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Banner printed when every check passed.
pub const PASS_BANNER: &str = "===== TEST PASSED =====";

/// Banner printed when any check failed.
pub const FAIL_BANNER: &str = "===== TEST FAILED =====";

/// The outcome of one harness run.
#[derive(Clone, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
pub struct HarnessReport {
    /// Which testbench produced the report.
    pub name: String,
    /// Clock edges simulated (vectors, for the combinational ALU).
    pub ticks: u64,
    /// Comparisons performed.
    pub checks: usize,
    /// Comparisons that failed.
    pub failures: usize,
    /// Stimulus warnings.
    pub warnings: usize,
    /// Coverage notes.
    pub notes: usize,
    /// Set when the halt policy cut the run short.
    pub halted: bool,
}

impl HarnessReport {
    /// Creates an empty report for the named testbench.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// A run passes when no check failed.
    pub fn passed(&self) -> bool {
        self.failures == 0
    }

    /// The banner line for this outcome.
    pub fn banner(&self) -> &'static str {
        if self.passed() {
            PASS_BANNER
        } else {
            FAIL_BANNER
        }
    }
}

impl fmt::Display for HarnessReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} checks, {} failed, {} warnings, {} notes over {} ticks",
            self.name, self.checks, self.failures, self.warnings, self.notes, self.ticks
        )?;
        if self.halted {
            write!(f, " (halted)")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pass_fail_banner() {
        let mut report = HarnessReport::new("calc");
        report.checks = 10;
        assert!(report.passed());
        assert_eq!(report.banner(), PASS_BANNER);
        report.failures = 1;
        assert!(!report.passed());
        assert_eq!(report.banner(), FAIL_BANNER);
    }

    #[test]
    fn warnings_do_not_fail() {
        let mut report = HarnessReport::new("calc");
        report.warnings = 3;
        report.notes = 7;
        assert!(report.passed());
    }

    #[test]
    fn summary_line() {
        let mut report = HarnessReport::new("alu");
        report.checks = 5;
        report.ticks = 5;
        report.halted = true;
        assert_eq!(
            report.to_string(),
            "alu: 5 checks, 0 failed, 0 warnings, 0 notes over 5 ticks (halted)"
        );
    }

    #[test]
    fn serializes_to_json() {
        let report = HarnessReport::new("regfile");
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"name\":\"regfile\""));
        let back: HarnessReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back, report);
    }
}
