//! Error types for building and running the register-transfer models.

use std::io;

/// Errors raised by the simulation models themselves.
///
/// A design computing the wrong value is not a `SimError`; that is for the
/// verification harness to find. These cover misuse of the models and
/// waveform output failures.
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    /// A register or bus width outside what the model supports.
    #[error("unsupported width {width} (expected {min}..={max})")]
    WidthOutOfRange {
        /// The requested width.
        width: u32,
        /// Smallest supported width.
        min: u32,
        /// Largest supported width.
        max: u32,
    },

    /// A register-file address beyond the last register.
    #[error("register address {addr} out of range (depth {depth})")]
    AddressOutOfRange {
        /// The offending address.
        addr: u8,
        /// Number of registers.
        depth: usize,
    },

    /// A trace sample referenced a signal that was never registered.
    #[error("unregistered trace signal {0}")]
    UnregisteredSignal(u32),

    /// A trace sample had a different width than its registered signal.
    #[error("trace signal '{name}' is {expected} bits wide, got {actual}")]
    TraceWidthMismatch {
        /// Signal name.
        name: String,
        /// Registered width.
        expected: u32,
        /// Width of the sampled value.
        actual: u32,
    },

    /// An I/O error occurred while writing waveform data.
    #[error("waveform I/O error: {0}")]
    WaveformIo(#[from] io::Error),
}
