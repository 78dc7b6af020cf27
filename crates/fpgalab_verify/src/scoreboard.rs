//! Comparison of design outputs against the reference model.

use fpgalab_common::LogicWord;
use fpgalab_diagnostics::{Diagnostic, DiagnosticCode, DiagnosticSink, TickStamp};

use crate::error::VerifyError;
use crate::report::HarnessReport;

/// Counts checks, emits a diagnostic for each failure and applies the halt
/// policy.
pub struct Scoreboard<'a> {
    sink: &'a DiagnosticSink,
    period_ps: u64,
    halt_on_failure: bool,
    report: HarnessReport,
}

impl<'a> Scoreboard<'a> {
    /// Creates a scoreboard reporting into `sink`.
    pub fn new(
        name: &str,
        sink: &'a DiagnosticSink,
        period_ps: u64,
        halt_on_failure: bool,
    ) -> Self {
        Self {
            sink,
            period_ps,
            halt_on_failure,
            report: HarnessReport::new(name),
        }
    }

    /// The running totals.
    pub fn report(&self) -> &HarnessReport {
        &self.report
    }

    /// Closes the run and returns the final report.
    pub fn finish(&mut self, ticks: u64, halted: bool) -> HarnessReport {
        self.report.ticks = ticks;
        self.report.halted = halted;
        self.report.clone()
    }

    fn stamp(&self, tick: u64) -> TickStamp {
        TickStamp::new(tick, self.period_ps)
    }

    /// Records a passing check.
    pub fn pass(&mut self) {
        self.report.checks += 1;
    }

    /// Records a failing check and applies the halt policy.
    pub fn fail(&mut self, tick: u64, diag: Diagnostic) -> Result<(), VerifyError> {
        self.report.checks += 1;
        self.report.failures += 1;
        self.sink.emit(diag.at(self.stamp(tick)));
        if self.halt_on_failure {
            return Err(VerifyError::Halted {
                tick,
                failures: self.report.failures,
            });
        }
        Ok(())
    }

    /// Emits a stimulus warning.
    pub fn warn(&mut self, tick: u64, diag: Diagnostic) {
        self.report.warnings += 1;
        self.sink.emit(diag.at(self.stamp(tick)));
    }

    /// Emits a coverage note.
    pub fn note(&mut self, tick: u64, diag: Diagnostic) {
        self.report.notes += 1;
        self.sink.emit(diag.at(self.stamp(tick)));
    }

    /// Compares an output word against the model.
    ///
    /// When the model has no defined value yet (before the first reset) the
    /// output may be anything, unknown bits included, and no check is
    /// counted. Once defined, any unknown bit is an
    /// [`UNKNOWN_VALUE`](DiagnosticCode::UNKNOWN_VALUE) failure and a wrong
    /// value is reported under `mismatch`.
    pub fn check_word(
        &mut self,
        tick: u64,
        mismatch: DiagnosticCode,
        signal: &str,
        actual: &LogicWord,
        expected: Option<u64>,
        context: &str,
    ) -> Result<(), VerifyError> {
        let Some(expected) = expected else {
            return Ok(());
        };
        let width = actual.width();
        let expected_word = LogicWord::from_u64(expected, width);
        match actual.to_u64() {
            None => {
                let diag = Diagnostic::error(
                    DiagnosticCode::UNKNOWN_VALUE,
                    format!("{signal} has unknown bits after {context}"),
                )
                .with_note(format!("expected {}", expected_word.to_hex_string()))
                .with_note(format!("actual   {}", actual.to_hex_string()));
                self.fail(tick, diag)
            }
            Some(value) if LogicWord::from_u64(value, width) != expected_word => {
                let diag = Diagnostic::error(
                    mismatch,
                    format!("{signal} mismatch after {context}"),
                )
                .with_note(format!("expected {}", expected_word.to_hex_string()))
                .with_note(format!("actual   {}", actual.to_hex_string()));
                self.fail(tick, diag)
            }
            Some(_) => {
                self.pass();
                Ok(())
            }
        }
    }

    /// Checks that a word held its value across an edge.
    pub fn check_stable(
        &mut self,
        tick: u64,
        signal: &str,
        before: &LogicWord,
        after: &LogicWord,
        context: &str,
    ) -> Result<(), VerifyError> {
        if before == after {
            self.pass();
            return Ok(());
        }
        let diag = Diagnostic::error(
            DiagnosticCode::SPURIOUS_UPDATE,
            format!("{signal} changed without a commit during {context}"),
        )
        .with_note(format!("before {}", before.to_hex_string()))
        .with_note(format!("after  {}", after.to_hex_string()));
        self.fail(tick, diag)
    }
}
