//! Configuration types deserialized from `fpgalab.toml`.

use serde::Deserialize;
use std::path::PathBuf;

/// The top-level configuration parsed from `fpgalab.toml`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LabConfig {
    /// Clock settings.
    #[serde(default)]
    pub clock: ClockConfig,
    /// Calculator testbench settings.
    #[serde(default)]
    pub harness: HarnessConfig,
    /// ALU testbench settings.
    #[serde(default)]
    pub alu: AluConfig,
    /// Register-file testbench settings.
    #[serde(default)]
    pub regfile: RegfileConfig,
    /// Up/down button counter testbench settings.
    #[serde(default)]
    pub counter: CounterConfig,
    /// Waveform dump settings.
    #[serde(default)]
    pub waveform: WaveformConfig,
}

/// The simulated clock.
#[derive(Debug, Clone, Deserialize)]
pub struct ClockConfig {
    /// Clock frequency such as `"100MHz"`, parsed to
    /// [`Frequency`](fpgalab_common::Frequency) during validation.
    #[serde(default = "default_frequency")]
    pub frequency: String,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            frequency: default_frequency(),
        }
    }
}

/// Stimulus timing and failure policy for the calculator testbench.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    /// Seed for every pseudo-random stimulus stream.
    pub seed: u64,
    /// Random vectors generated per calculator operation.
    pub random_per_op: u32,
    /// Random switch changes applied without pressing commit.
    pub idle_events: u32,
    /// Ticks the select and operand lines are held before commit is pressed.
    pub setup_ticks: u32,
    /// Ticks the commit button is held down.
    pub hold_ticks: u32,
    /// Ticks the commit button is released before the next event.
    pub release_ticks: u32,
    /// Stop at the first failed check instead of counting failures.
    pub halt_on_failure: bool,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            seed: 323,
            random_per_op: 10,
            idle_events: 20,
            setup_ticks: 2,
            hold_ticks: 4,
            release_ticks: 4,
            halt_on_failure: false,
        }
    }
}

/// ALU testbench settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AluConfig {
    /// Random operand pairs per 4-bit opcode.
    pub random_per_op: u32,
}

impl Default for AluConfig {
    fn default() -> Self {
        Self { random_per_op: 50 }
    }
}

/// Register-file testbench settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RegfileConfig {
    /// Number of random read/write events.
    pub events: u32,
}

impl Default for RegfileConfig {
    fn default() -> Self {
        Self { events: 300 }
    }
}

/// Up/down button counter testbench settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CounterConfig {
    /// Number of random button presses.
    pub presses: u32,
    /// Longest random hold, in ticks.
    pub max_hold_ticks: u32,
}

impl Default for CounterConfig {
    fn default() -> Self {
        Self {
            presses: 40,
            max_hold_ticks: 12,
        }
    }
}

/// Waveform dump settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WaveformConfig {
    /// Whether to write a VCD file for the calculator run.
    pub enabled: bool,
    /// Output path for the VCD file.
    pub path: PathBuf,
}

impl Default for WaveformConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            path: PathBuf::from("calc.vcd"),
        }
    }
}

fn default_frequency() -> String {
    "100MHz".to_string()
}
