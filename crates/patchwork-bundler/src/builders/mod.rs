//! Build execution.
//!
//! [`BuildBackend`] is the seam between the orchestrator and the bundler.
//! [`RolldownBackend`] is the production implementation; the orchestrator
//! only sees targets going in and artifacts (or errors) coming out.

mod build_executor;
pub mod writer;

pub use build_executor::RolldownBackend;

use async_trait::async_trait;
use std::path::PathBuf;

use crate::Result;
use crate::config::BuildConfig;
use crate::target::BuildTarget;

/// A written build artifact
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltArtifact {
    /// Artifact path
    pub path: PathBuf,
    /// Artifact size in bytes, footer included
    pub size: u64,
    /// External source map, when one was written
    pub sourcemap: Option<PathBuf>,
}

/// Something that can turn one build target into an artifact on disk
#[async_trait]
pub trait BuildBackend: Send + Sync + std::fmt::Debug {
    /// Bundle `target` and write its output.
    async fn build(&self, target: &BuildTarget, config: &BuildConfig) -> Result<BuiltArtifact>;
}
