//! Parsing and validation of `fpgalab.toml` configuration files.
//!
//! Every section is optional; a missing file section falls back to the
//! defaults the lab testbenches were written against (100 MHz clock,
//! 300 register-file events, and so on).

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod types;

pub use error::ConfigError;
pub use loader::{load_config, load_config_file, load_config_from_str, CONFIG_FILE_NAME};
pub use types::*;
