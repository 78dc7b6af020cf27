//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::types::LabConfig;
use fpgalab_common::Frequency;
use std::path::Path;

/// Name of the configuration file looked up in a lab directory.
pub const CONFIG_FILE_NAME: &str = "fpgalab.toml";

/// Loads `<lab_dir>/fpgalab.toml`, or returns the defaults if it does not exist.
pub fn load_config(lab_dir: &Path) -> Result<LabConfig, ConfigError> {
    let config_path = lab_dir.join(CONFIG_FILE_NAME);
    if !config_path.is_file() {
        return Ok(LabConfig::default());
    }
    load_config_file(&config_path)
}

/// Loads and validates a configuration from an explicit file path.
pub fn load_config_file(path: &Path) -> Result<LabConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    load_config_from_str(&content)
}

/// Parses and validates a configuration from a string.
pub fn load_config_from_str(content: &str) -> Result<LabConfig, ConfigError> {
    let config: LabConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

impl LabConfig {
    /// Returns the parsed clock frequency.
    pub fn clock_frequency(&self) -> Result<Frequency, ConfigError> {
        let freq: Frequency = self
            .clock
            .frequency
            .parse()
            .map_err(|e| ConfigError::ValidationError(format!("clock.frequency: {e}")))?;
        if !freq.is_valid() {
            return Err(ConfigError::ValidationError(format!(
                "clock.frequency must be positive, got {}",
                self.clock.frequency
            )));
        }
        if freq.period_ps() == 0 {
            return Err(ConfigError::ValidationError(format!(
                "clock.frequency {} has a period below 1 ps",
                self.clock.frequency
            )));
        }
        Ok(freq)
    }
}

/// Checks the values serde cannot: positive timing, non-empty runs.
fn validate_config(config: &LabConfig) -> Result<(), ConfigError> {
    config.clock_frequency()?;
    let at_least_one = [
        ("harness.hold_ticks", config.harness.hold_ticks),
        ("harness.release_ticks", config.harness.release_ticks),
        ("regfile.events", config.regfile.events),
        ("counter.max_hold_ticks", config.counter.max_hold_ticks),
    ];
    for (name, value) in at_least_one {
        if value == 0 {
            return Err(ConfigError::ValidationError(format!(
                "{name} must be at least 1"
            )));
        }
    }
    Ok(())
}
