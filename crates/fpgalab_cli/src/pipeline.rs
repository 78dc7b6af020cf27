//! Shared plumbing for the bench commands: config resolution, CLI
//! overrides and live diagnostic rendering.

use std::path::{Path, PathBuf};

use fpgalab_config::LabConfig;
use fpgalab_diagnostics::{
    DiagnosticRenderer, DiagnosticSink, JsonRenderer, TerminalRenderer,
};
use fpgalab_verify::HarnessReport;

use crate::{BenchArgs, GlobalArgs, ReportFormat};

/// Loads the lab configuration.
///
/// `--config` may name a file or a directory; without it the current
/// directory is searched. A missing `fpgalab.toml` yields the defaults.
pub fn load_lab_config(global: &GlobalArgs) -> Result<LabConfig, Box<dyn std::error::Error>> {
    let config = match global.config {
        Some(ref path) => {
            let p = PathBuf::from(path);
            if p.is_file() {
                fpgalab_config::load_config_file(&p)?
            } else {
                fpgalab_config::load_config(&p)?
            }
        }
        None => fpgalab_config::load_config(&std::env::current_dir()?)?,
    };
    Ok(config)
}

/// Applies command-line overrides on top of the file configuration.
pub fn apply_overrides(config: &mut LabConfig, args: &BenchArgs) {
    if let Some(seed) = args.seed {
        config.harness.seed = seed;
    }
    if args.halt_on_failure {
        config.harness.halt_on_failure = true;
    }
    if let Some(ref path) = args.vcd {
        config.waveform.enabled = true;
        config.waveform.path = path.clone();
    }
}

/// Resolves the config and applies the overrides in one step.
pub fn bench_config(
    global: &GlobalArgs,
    args: &BenchArgs,
) -> Result<LabConfig, Box<dyn std::error::Error>> {
    let mut config = load_lab_config(global)?;
    apply_overrides(&mut config, args);
    Ok(config)
}

/// Creates a sink that prints each diagnostic to stderr as it is emitted.
///
/// With `--quiet` only errors are printed.
pub fn live_sink(global: &GlobalArgs) -> DiagnosticSink {
    let quiet = global.quiet;
    let renderer: Box<dyn DiagnosticRenderer + Send + Sync> = match global.format {
        ReportFormat::Text => Box::new(TerminalRenderer::new(global.color)),
        ReportFormat::Json => Box::new(JsonRenderer),
    };
    DiagnosticSink::with_observer(move |diag| {
        if quiet && !diag.severity.is_error() {
            return;
        }
        eprint!("{}", renderer.render(diag));
    })
}

/// Prints the outcome on stdout: the pass/fail banner as text, or the
/// reports as a JSON array.
pub fn print_reports(
    reports: &[HarnessReport],
    passed: bool,
    global: &GlobalArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    match global.format {
        ReportFormat::Json => println!("{}", serde_json::to_string_pretty(reports)?),
        ReportFormat::Text => {
            let banner = if passed {
                fpgalab_verify::PASS_BANNER
            } else {
                fpgalab_verify::FAIL_BANNER
            };
            println!("{banner}");
        }
    }
    Ok(())
}

/// Describes the waveform destination for status lines.
pub fn waveform_note(config: &LabConfig) -> Option<&Path> {
    config
        .waveform
        .enabled
        .then_some(config.waveform.path.as_path())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn global(config: Option<String>) -> GlobalArgs {
        GlobalArgs {
            quiet: true,
            verbose: false,
            color: false,
            config,
            format: ReportFormat::Text,
        }
    }

    #[test]
    fn config_from_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("lab.toml");
        fs::write(&path, "[harness]\nseed = 7\n").unwrap();
        let config = load_lab_config(&global(Some(path.to_str().unwrap().to_string()))).unwrap();
        assert_eq!(config.harness.seed, 7);
    }

    #[test]
    fn config_from_dir_without_file_uses_defaults() {
        let tmp = TempDir::new().unwrap();
        let config = load_lab_config(&global(Some(tmp.path().to_str().unwrap().to_string()))).unwrap();
        assert_eq!(config.harness.seed, 323);
    }

    #[test]
    fn invalid_config_is_an_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("fpgalab.toml"), "[harness]\nhold_ticks = 0\n").unwrap();
        assert!(load_lab_config(&global(Some(tmp.path().to_str().unwrap().to_string()))).is_err());
    }

    #[test]
    fn overrides_win() {
        let mut config = LabConfig::default();
        let args = BenchArgs {
            seed: Some(99),
            halt_on_failure: true,
            vcd: Some(PathBuf::from("x.vcd")),
        };
        apply_overrides(&mut config, &args);
        assert_eq!(config.harness.seed, 99);
        assert!(config.harness.halt_on_failure);
        assert_eq!(waveform_note(&config), Some(Path::new("x.vcd")));
    }

    #[test]
    fn no_overrides_keeps_file_values() {
        let mut config = LabConfig::default();
        apply_overrides(&mut config, &BenchArgs::default());
        assert_eq!(config.harness.seed, 323);
        assert!(!config.harness.halt_on_failure);
        assert_eq!(waveform_note(&config), None);
    }
}
