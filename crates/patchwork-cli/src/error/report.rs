//! Miette report conversion for CLI errors.

use crate::error::{BuildError, CliError};
use miette::Report;

/// Convert a CLI error into a miette report for `main`.
///
/// Bundler errors carry their own diagnostic codes and help, so they are
/// wrapped directly instead of being flattened to text.
pub fn cli_error_to_miette(err: CliError) -> Report {
    match err {
        CliError::Bundler(e) => Report::new(e),
        CliError::Build(BuildError::TargetsFailed {
            failed,
            total,
            first,
        }) => miette::miette!(
            help = "Run with --verbose for per-target details",
            "Build failed: {} of {} targets failed\n\nFirst error: {}",
            failed,
            total,
            first
        ),
        CliError::Config(e) => miette::miette!("Configuration error: {}", e),
        other => miette::miette!("{}", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundler_error_keeps_code() {
        let report = cli_error_to_miette(CliError::Bundler(
            patchwork_bundler::Error::InvalidConfig("version cannot be empty".to_string()),
        ));
        let code = report.code().map(|c| c.to_string());
        assert_eq!(code.as_deref(), Some("INVALID_CONFIG"));
    }

    #[test]
    fn test_build_failure_message() {
        let report = cli_error_to_miette(CliError::Build(BuildError::TargetsFailed {
            failed: 1,
            total: 6,
            first: "vesktop/main: boom".to_string(),
        }));
        let msg = report.to_string();
        assert!(msg.starts_with("Build failed: 1 of 6 targets failed"));
        assert!(msg.contains("vesktop/main: boom"));
    }
}
