//! Tick-accurate register-transfer models of the lab designs.
//!
//! Every sequential element is a plain struct with a pure `next` function
//! and an `advance` that commits it, so a top level can compute all next
//! states from the current ones before updating anything. That gives the
//! same result as flip-flops sharing one clock edge.
//!
//! # Modules
//!
//! - `synchronizer`, `oneshot`: asynchronous button conditioning
//! - `alu`: the nine-operation 32-bit ALU
//! - `control`: accumulator register and function decode
//! - `calculator`: the full button calculator
//! - `button_counter`: the up/down button counter
//! - `regfile`: register-file contract and behavioral model
//! - `waveform`: VCD and in-memory tracing
//! - `time`: the tick clock

#![warn(missing_docs)]

pub mod alu;
pub mod button_counter;
pub mod calculator;
pub mod control;
pub mod error;
pub mod oneshot;
pub mod regfile;
pub mod synchronizer;
pub mod time;
pub mod waveform;

pub use alu::{evaluate, evaluate_code, evaluate_word, AluOp, AluOutput, ALU_WIDTH};
pub use button_counter::{ButtonCounter, CounterInputs, COUNTER_WIDTH};
pub use calculator::{Calculator, CalculatorEdge, CalculatorInputs, COMMIT_LATENCY};
pub use control::{
    decode_function, function_select, ControlAction, ControlInputs, ControlUnit, CALC_WIDTH,
    FUNCTION_TABLE, FUNCTION_WIDTH,
};
pub use error::SimError;
pub use oneshot::OneShot;
pub use regfile::{RegFile, RegFileInputs, RegisterFile, REG_COUNT};
pub use synchronizer::{Synchronizer, SYNC_STAGES};
pub use time::Clock;
pub use waveform::{MemoryTrace, TraceRecorder, TraceSample, TraceSignalId, VcdRecorder};
