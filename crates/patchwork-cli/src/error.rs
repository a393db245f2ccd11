//! Error handling for the Patchwork CLI.
//!
//! - [`CliError`] is what commands return; it converts from everything below
//! - [`ConfigError`] covers config file loading and validation
//! - [`BuildError`] covers the outcome of a build run
//! - [`ResultExt`] attaches paths and context to any convertible error
//!
//! Bundler errors keep their own `miette::Diagnostic` impl and are reported
//! through it; see [`cli_error_to_miette`].

mod report;

use std::path::PathBuf;
use thiserror::Error;

pub use report::cli_error_to_miette;

/// Top-level CLI error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration-related errors (file not found, invalid values)
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Build run failures
    #[error("{0}")]
    Build(#[from] BuildError),

    /// Errors from the bundler library
    #[error(transparent)]
    Bundler(#[from] patchwork_bundler::Error),

    /// Invalid command-line arguments or options
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// File or directory not found
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// I/O errors from file system operations
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// File watching errors
    #[error("File watcher error: {0}")]
    Watch(#[from] notify::Error),

    /// Generic errors with custom messages
    #[error("{0}")]
    Custom(String),
}

/// Configuration-specific errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file given with `--config` doesn't exist
    #[error("Config file not found: {}\n\nHint: Create patchwork.config.json or fix the --config path", .0.display())]
    NotFound(PathBuf),

    /// Missing required configuration field
    #[error("Missing required field: {field}\n\nHint: {hint}")]
    MissingField {
        /// Name of the missing field
        field: String,
        /// Helpful hint for providing the field
        hint: String,
    },

    /// Invalid value for a configuration option
    #[error("Invalid value for '{field}': {value}\n\nHint: {hint}")]
    InvalidValue {
        /// Name of the field with invalid value
        field: String,
        /// The invalid value
        value: String,
        /// Helpful hint for correct values
        hint: String,
    },
}

/// Build run errors.
#[derive(Debug, Error)]
pub enum BuildError {
    /// One or more targets failed outside watch mode
    #[error("Build failed: {failed} of {total} targets failed")]
    TargetsFailed {
        /// Number of failed targets
        failed: usize,
        /// Number of targets attempted
        total: usize,
        /// Message of the first failure
        first: String,
    },

    /// Project root has no `src/` directory
    #[error("Source directory not found: {}\n\nHint: Run patchwork from the project root or pass --cwd", .0.display())]
    SourceRootMissing(PathBuf),
}

/// Result type alias using `CliError` as the default error type.
pub type Result<T, E = CliError> = std::result::Result<T, E>;

/// Extension trait for adding context to `Result` types.
pub trait ResultExt<T> {
    /// Turn a not-found I/O error into [`CliError::FileNotFound`] for `path`.
    ///
    /// ```rust,no_run
    /// # use std::path::Path;
    /// # use patchwork_cli::error::{Result, ResultExt};
    /// # fn run() -> Result<()> {
    /// let path = Path::new("patchwork.config.json");
    /// std::fs::read_to_string(path).with_path(path)?;
    /// # Ok(())
    /// # }
    /// ```
    fn with_path(self, path: impl AsRef<std::path::Path>) -> Result<T>;

    /// Prefix the error message.
    fn context(self, msg: impl std::fmt::Display) -> Result<T>;
}

impl<T, E: Into<CliError>> ResultExt<T> for std::result::Result<T, E> {
    fn with_path(self, path: impl AsRef<std::path::Path>) -> Result<T> {
        self.map_err(|e| match e.into() {
            CliError::Io(io_err) if io_err.kind() == std::io::ErrorKind::NotFound => {
                CliError::FileNotFound(path.as_ref().to_path_buf())
            }
            other => other,
        })
    }

    fn context(self, msg: impl std::fmt::Display) -> Result<T> {
        self.map_err(|e| {
            let err: CliError = e.into();
            CliError::Custom(format!("{}: {}", msg, err))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_not_found() {
        let err = ConfigError::NotFound(PathBuf::from("custom.json"));
        let msg = err.to_string();
        assert!(msg.contains("Config file not found"));
        assert!(msg.contains("custom.json"));
        assert!(msg.contains("Hint:"));
    }

    #[test]
    fn test_config_error_invalid_value() {
        let err = ConfigError::InvalidValue {
            field: "banner.releasesUrl".to_string(),
            value: "\"\"".to_string(),
            hint: "Set a releases feed URL or disable the banner".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("Invalid value for 'banner.releasesUrl'"));
        assert!(msg.contains("disable the banner"));
    }

    #[test]
    fn test_build_error_message() {
        let err = BuildError::TargetsFailed {
            failed: 2,
            total: 6,
            first: "vesktop/main: Could not resolve".to_string(),
        };
        assert_eq!(err.to_string(), "Build failed: 2 of 6 targets failed");
    }

    #[test]
    fn test_cli_error_from_config_error() {
        let cli_err: CliError = ConfigError::NotFound(PathBuf::from("x.json")).into();
        assert!(matches!(cli_err, CliError::Config(_)));
    }

    #[test]
    fn test_cli_error_from_bundler_error() {
        let bundler_err = patchwork_bundler::Error::InvalidConfig("bad".to_string());
        let cli_err: CliError = bundler_err.into();
        assert!(matches!(cli_err, CliError::Bundler(_)));
        assert_eq!(cli_err.to_string(), "Invalid configuration: bad");
    }

    #[test]
    fn test_result_ext_with_path() {
        let result: std::io::Result<()> = Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "file not found",
        ));

        let err = result.with_path("/project/src").unwrap_err();
        assert!(matches!(err, CliError::FileNotFound(_)));
    }

    #[test]
    fn test_result_ext_with_path_keeps_other_errors() {
        let result: std::io::Result<()> = Err(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "denied",
        ));

        let err = result.with_path("/project").unwrap_err();
        assert!(matches!(err, CliError::Io(_)));
    }

    #[test]
    fn test_result_ext_context() {
        let result: std::result::Result<(), ConfigError> =
            Err(ConfigError::NotFound(PathBuf::from("test.json")));

        let msg = result.context("Failed to start watcher").unwrap_err().to_string();
        assert!(msg.starts_with("Failed to start watcher: "));
    }
}
