//! # patchwork-bundler
//!
//! Rolldown-based builds for the client mod: three entry points (main process,
//! renderer, preload) for each of two product variants, plus the
//! `~pluginNatives` virtual module and the post-build banner patch.
//!
//! ## Quick Start
//!
//! ```no_run
//! use patchwork_bundler::{BuildConfig, Orchestrator};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let config = BuildConfig::new(".").dev(true);
//! let report = Orchestrator::new(config).run().await;
//!
//! for outcome in &report.outcomes {
//!     println!("{}: {}", outcome.target.id(), outcome.result.is_ok());
//! }
//! std::process::exit(report.exit_code(false));
//! # }
//! ```
//!
//! ### Inspect the generated natives module
//!
//! ```no_run
//! let module = patchwork_bundler::natives::scan_natives("./src");
//! print!("{}", module.render());
//! ```

pub mod builders;
pub mod config;
pub mod defines;
pub mod natives;
pub mod orchestrator;
pub mod patch;
pub mod plugins;
pub mod target;

// Re-export core Rolldown types used by the public API
pub use rolldown::{OutputFormat, Platform};
pub use rolldown_plugin::{__inner::SharedPluginable, Plugin};

pub use builders::{BuildBackend, BuiltArtifact, RolldownBackend};
pub use config::BuildConfig;
pub use defines::Defines;
pub use natives::{NativeModule, NativesModule, scan_natives};
pub use orchestrator::{BuildReport, Orchestrator, TargetOutcome};
pub use patch::{BannerOptions, BannerPatch, GithubReleases, VersionSource, patch_banner};
pub use plugins::NativesPlugin;
pub use target::{BuildTarget, EntryKind, ModuleFormat, Variant};

/// Error types for patchwork-bundler operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Error from the Rolldown bundler for one build target.
    #[error("{target}: {message}")]
    Bundler { target: String, message: String },

    /// Rolldown produced no JavaScript entry chunk.
    #[error("{0}: bundler emitted no entry chunk")]
    MissingEntryChunk(String),

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// I/O error with context message.
    #[error("{message}")]
    IoError {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// File write operation failed.
    #[error("Write failure: {0}")]
    WriteFailure(String),

    /// HTTP request to the release feed failed.
    #[error("Release feed request failed: {0}")]
    Fetch(#[from] reqwest::Error),

    /// Release feed answered with something unusable.
    #[error("Malformed release feed: {0}")]
    ReleaseFeed(String),

    /// Artifact could not be patched (e.g. the marker line is missing).
    #[error("Banner patch failed: {0}")]
    Patch(String),

    /// A build task panicked or was cancelled.
    #[error("Build task for {target} did not complete: {message}")]
    TaskAborted { target: String, message: String },
}

/// Result type alias for patchwork-bundler operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a bundler error from a Rolldown error batch.
    ///
    /// Rolldown's diagnostics only guarantee `Debug`, so the batch is rendered
    /// through it.
    pub fn from_rolldown_batch(target: impl Into<String>, error: &dyn std::fmt::Debug) -> Self {
        Error::Bundler {
            target: target.into(),
            message: format!("{:?}", error),
        }
    }

    /// Wrap an I/O error with a message naming the path involved.
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Error::IoError {
            message: message.into(),
            source,
        }
    }
}

impl miette::Diagnostic for Error {
    fn code(&self) -> Option<Box<dyn std::fmt::Display + '_>> {
        Some(Box::new(match self {
            Error::Bundler { .. } => "BUNDLER_ERROR",
            Error::MissingEntryChunk(_) => "MISSING_ENTRY_CHUNK",
            Error::InvalidConfig(_) => "INVALID_CONFIG",
            Error::Io(_) => "IO_ERROR",
            Error::IoError { .. } => "IO_ERROR",
            Error::WriteFailure(_) => "WRITE_FAILURE",
            Error::Fetch(_) => "FETCH_ERROR",
            Error::ReleaseFeed(_) => "RELEASE_FEED",
            Error::Patch(_) => "PATCH_ERROR",
            Error::TaskAborted { .. } => "TASK_ABORTED",
        }))
    }

    fn severity(&self) -> Option<miette::Severity> {
        match self {
            // Banner patching is best-effort
            Error::Fetch(_) | Error::ReleaseFeed(_) | Error::Patch(_) => {
                Some(miette::Severity::Warning)
            }
            _ => Some(miette::Severity::Error),
        }
    }

    fn help(&self) -> Option<Box<dyn std::fmt::Display + '_>> {
        match self {
            Error::InvalidConfig(msg) => Some(Box::new(format!(
                "Check patchwork.config.json and the PATCHWORK_* environment variables.\nError: {}",
                msg
            ))),
            Error::WriteFailure(msg) => Some(Box::new(format!(
                "Failed to write file. Check disk space and permissions.\nError: {}",
                msg
            ))),
            Error::MissingEntryChunk(_) => Some(Box::new(
                "The entry point produced no output. Check that it exists and exports code.",
            )),
            Error::Patch(_) => Some(Box::new(
                "The marker line is searched verbatim; make sure the built artifact contains it.",
            )),
            Error::TaskAborted { .. } => Some(Box::new(
                "This is a bug in patchwork. Please report it.",
            )),
            _ => None,
        }
    }
}
