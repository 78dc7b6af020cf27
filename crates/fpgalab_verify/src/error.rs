//! Errors that stop a harness run.

use fpgalab_config::ConfigError;
use fpgalab_sim::{AluOp, SimError};

/// Reasons a harness run ended before completing its stimulus.
///
/// Failed checks are not errors on their own: they are emitted as
/// diagnostics and counted in the report. Only the halt policy turns the
/// first failure into [`VerifyError::Halted`].
#[derive(Debug, thiserror::Error)]
pub enum VerifyError {
    /// The halt-on-failure policy stopped the run.
    #[error("halted at tick {tick} after {failures} failed check(s)")]
    Halted {
        /// Tick of the failing check.
        tick: u64,
        /// Failures counted when the run stopped.
        failures: usize,
    },

    /// A stimulus named a function the select buttons cannot reach.
    #[error("function {0} cannot be selected on the calculator")]
    UnreachableFunction(AluOp),

    /// The configuration could not be turned into harness settings.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A model was misused or a trace could not be written.
    #[error(transparent)]
    Sim(#[from] SimError),

    /// The waveform file could not be created.
    #[error("failed to create waveform file: {0}")]
    Io(#[from] std::io::Error),
}
