//! Waveform recording.
//!
//! The [`TraceRecorder`] trait abstracts trace output. [`VcdRecorder`]
//! writes IEEE 1364 Value Change Dump text viewable in GTKWave or Surfer;
//! [`MemoryTrace`] keeps samples in memory so two runs can be compared.

use std::io::Write;

use fpgalab_common::{Logic, LogicWord};
use serde::{Deserialize, Serialize};

use crate::error::SimError;

/// Handle returned when a signal is registered with a recorder.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct TraceSignalId(u32);

impl TraceSignalId {
    /// Returns the raw index.
    pub fn as_raw(self) -> u32 {
        self.0
    }
}

/// Sink for per-tick signal values.
pub trait TraceRecorder {
    /// Registers a signal and returns its handle.
    fn register_signal(&mut self, name: &str, width: u32) -> Result<TraceSignalId, SimError>;

    /// Records the value of a signal at a tick.
    fn record(&mut self, tick: u64, id: TraceSignalId, value: &LogicWord) -> Result<(), SimError>;

    /// Flushes any buffered output.
    fn finalize(&mut self) -> Result<(), SimError>;
}

struct VcdSignal {
    code: String,
    name: String,
    width: u32,
    last: Option<LogicWord>,
}

/// VCD recorder with a picosecond timescale.
///
/// Only value changes are written. Identifier codes use printable ASCII
/// starting at `!`.
pub struct VcdRecorder<W: Write> {
    writer: W,
    scope: String,
    period_ps: u64,
    signals: Vec<VcdSignal>,
    definitions_closed: bool,
    current_tick: Option<u64>,
}

impl<W: Write> VcdRecorder<W> {
    /// Creates a recorder writing one module scope named `scope`.
    pub fn new(writer: W, scope: impl Into<String>, period_ps: u64) -> Self {
        Self {
            writer,
            scope: scope.into(),
            period_ps,
            signals: Vec::new(),
            definitions_closed: false,
            current_tick: None,
        }
    }

    /// Returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }

    fn make_id_code(index: u32) -> String {
        let mut code = String::new();
        let mut idx = index;
        loop {
            code.push((b'!' + (idx % 94) as u8) as char);
            idx /= 94;
            if idx == 0 {
                break;
            }
            idx -= 1;
        }
        code
    }

    fn format_value(value: &LogicWord) -> String {
        let bit = |b: Logic| match b {
            Logic::Zero => '0',
            Logic::One => '1',
            Logic::X => 'x',
        };
        if value.width() == 1 {
            bit(value.get(0)).to_string()
        } else {
            let mut s = String::with_capacity(value.width() as usize + 1);
            s.push('b');
            for i in (0..value.width()).rev() {
                s.push(bit(value.get(i)));
            }
            s
        }
    }

    fn close_definitions(&mut self) -> Result<(), SimError> {
        if self.definitions_closed {
            return Ok(());
        }
        writeln!(self.writer, "$timescale 1ps $end")?;
        writeln!(self.writer, "$scope module {} $end", self.scope)?;
        for sig in &self.signals {
            writeln!(
                self.writer,
                "$var wire {} {} {} $end",
                sig.width, sig.code, sig.name
            )?;
        }
        writeln!(self.writer, "$upscope $end")?;
        writeln!(self.writer, "$enddefinitions $end")?;
        self.definitions_closed = true;
        Ok(())
    }
}

impl<W: Write> TraceRecorder for VcdRecorder<W> {
    fn register_signal(&mut self, name: &str, width: u32) -> Result<TraceSignalId, SimError> {
        let id = TraceSignalId(self.signals.len() as u32);
        self.signals.push(VcdSignal {
            code: Self::make_id_code(id.0),
            name: name.to_string(),
            width,
            last: None,
        });
        Ok(id)
    }

    fn record(&mut self, tick: u64, id: TraceSignalId, value: &LogicWord) -> Result<(), SimError> {
        self.close_definitions()?;
        let sig = self
            .signals
            .get(id.0 as usize)
            .ok_or(SimError::UnregisteredSignal(id.0))?;
        if sig.width != value.width() {
            return Err(SimError::TraceWidthMismatch {
                name: sig.name.clone(),
                expected: sig.width,
                actual: value.width(),
            });
        }
        if sig.last.as_ref() == Some(value) {
            return Ok(());
        }
        if self.current_tick != Some(tick) {
            writeln!(self.writer, "#{}", tick.saturating_mul(self.period_ps))?;
            self.current_tick = Some(tick);
        }
        let text = Self::format_value(value);
        let sig = &mut self.signals[id.0 as usize];
        if sig.width == 1 {
            writeln!(self.writer, "{text}{}", sig.code)?;
        } else {
            writeln!(self.writer, "{text} {}", sig.code)?;
        }
        sig.last = Some(*value);
        Ok(())
    }

    fn finalize(&mut self) -> Result<(), SimError> {
        self.close_definitions()?;
        self.writer.flush()?;
        Ok(())
    }
}

/// One recorded value.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct TraceSample {
    /// Tick of the sample.
    pub tick: u64,
    /// Which signal.
    pub signal: TraceSignalId,
    /// The sampled value.
    pub value: LogicWord,
}

/// Keeps every sample in memory, changes or not.
#[derive(Clone, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
pub struct MemoryTrace {
    names: Vec<(String, u32)>,
    samples: Vec<TraceSample>,
}

impl MemoryTrace {
    /// Creates an empty trace.
    pub fn new() -> Self {
        Self::default()
    }

    /// All samples in recording order.
    pub fn samples(&self) -> &[TraceSample] {
        &self.samples
    }

    /// Samples of the named signal.
    pub fn signal(&self, name: &str) -> Vec<TraceSample> {
        let Some(idx) = self.names.iter().position(|(n, _)| n == name) else {
            return Vec::new();
        };
        self.samples
            .iter()
            .filter(|s| s.signal.0 as usize == idx)
            .copied()
            .collect()
    }
}

impl TraceRecorder for MemoryTrace {
    fn register_signal(&mut self, name: &str, width: u32) -> Result<TraceSignalId, SimError> {
        self.names.push((name.to_string(), width));
        Ok(TraceSignalId(self.names.len() as u32 - 1))
    }

    fn record(&mut self, tick: u64, id: TraceSignalId, value: &LogicWord) -> Result<(), SimError> {
        let (name, width) = self
            .names
            .get(id.0 as usize)
            .ok_or(SimError::UnregisteredSignal(id.0))?;
        if *width != value.width() {
            return Err(SimError::TraceWidthMismatch {
                name: name.clone(),
                expected: *width,
                actual: value.width(),
            });
        }
        self.samples.push(TraceSample {
            tick,
            signal: id,
            value: *value,
        });
        Ok(())
    }

    fn finalize(&mut self) -> Result<(), SimError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_codes() {
        assert_eq!(VcdRecorder::<Vec<u8>>::make_id_code(0), "!");
        assert_eq!(VcdRecorder::<Vec<u8>>::make_id_code(93), "~");
        assert_eq!(VcdRecorder::<Vec<u8>>::make_id_code(94), "!!");
    }

    #[test]
    fn vcd_header_and_changes() {
        let mut vcd = VcdRecorder::new(Vec::new(), "calc", 10_000);
        let pulse = vcd.register_signal("pulse", 1).unwrap();
        let leds = vcd.register_signal("leds", 4).unwrap();
        vcd.record(0, pulse, &LogicWord::from_bool(false)).unwrap();
        vcd.record(0, leds, &LogicWord::unknown(4)).unwrap();
        vcd.record(1, leds, &LogicWord::from_u64(0b1010, 4)).unwrap();
        vcd.record(2, leds, &LogicWord::from_u64(0b1010, 4)).unwrap();
        vcd.finalize().unwrap();
        let out = String::from_utf8(vcd.into_inner()).unwrap();
        assert!(out.contains("$scope module calc $end"));
        assert!(out.contains("$var wire 1 ! pulse $end"));
        assert!(out.contains("$var wire 4 \" leds $end"));
        assert!(out.contains("#0\n0!\nbxxxx \"\n"));
        assert!(out.contains("#10000\nb1010 \"\n"));
        assert!(!out.contains("#20000"));
    }

    #[test]
    fn vcd_rejects_wrong_width() {
        let mut vcd = VcdRecorder::new(Vec::new(), "top", 1);
        let id = vcd.register_signal("x", 8).unwrap();
        let err = vcd.record(0, id, &LogicWord::zero(4)).unwrap_err();
        assert!(matches!(err, SimError::TraceWidthMismatch { expected: 8, actual: 4, .. }));
    }

    #[test]
    fn memory_trace_keeps_every_sample() {
        let mut trace = MemoryTrace::new();
        let a = trace.register_signal("a", 2).unwrap();
        let b = trace.register_signal("b", 1).unwrap();
        for t in 0..3 {
            trace.record(t, a, &LogicWord::from_u64(1, 2)).unwrap();
            trace.record(t, b, &LogicWord::from_bool(t == 1)).unwrap();
        }
        assert_eq!(trace.samples().len(), 6);
        assert_eq!(trace.signal("a").len(), 3);
        assert!(trace.signal("missing").is_empty());
    }

    #[test]
    fn memory_trace_unregistered() {
        let mut trace = MemoryTrace::new();
        let mut other = MemoryTrace::new();
        let id = other.register_signal("x", 1).unwrap();
        assert!(matches!(
            trace.record(0, id, &LogicWord::from_bool(true)),
            Err(SimError::UnregisteredSignal(0))
        ));
    }
}
