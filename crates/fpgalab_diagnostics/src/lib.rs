//! Structured reporting for testbench checks.
//!
//! Every failed comparison, unexpected unknown value, or noteworthy stimulus
//! event becomes a [`Diagnostic`] with a severity, a stable code and the tick
//! it happened on. The thread-safe [`DiagnosticSink`] counts and stores them,
//! and a [`DiagnosticRenderer`] turns them into terminal text or JSON lines.

#![warn(missing_docs)]

pub mod code;
pub mod diagnostic;
pub mod renderer;
pub mod severity;
pub mod sink;
pub mod stamp;

pub use code::{Category, DiagnosticCode};
pub use diagnostic::Diagnostic;
pub use renderer::{DiagnosticRenderer, JsonRenderer, TerminalRenderer};
pub use severity::Severity;
pub use sink::DiagnosticSink;
pub use stamp::TickStamp;
