//! Post-build banner patch.
//!
//! One artifact gets its header replaced by a banner naming the latest
//! published release. The version comes from a [`VersionSource`]; the
//! production source is the GitHub releases API.
//!
//! The patch is best effort. Every failure comes back as an [`Error`] that
//! the orchestrator logs as a warning, and the artifact is only rewritten
//! once the new content is fully assembled.

use async_trait::async_trait;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::builders::writer::write_atomic;
use crate::{Error, Result};

/// Releases feed queried by default
pub const DEFAULT_RELEASES_URL: &str = "https://api.github.com/repos/Vencord/Vesktop/releases";

/// Line the banner is spliced in front of
pub const DEFAULT_MARKER: &str = "\"use strict\";";

/// Banner text; `{version}` is substituted
pub const DEFAULT_TEMPLATE: &str = "// Vesktop v{version}";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

const USER_AGENT: &str = concat!("patchwork/", env!("CARGO_PKG_VERSION"));

/// Something that knows the latest released version
#[async_trait]
pub trait VersionSource: Send + Sync + std::fmt::Debug {
    async fn latest_version(&self) -> Result<String>;
}

/// Version source backed by a GitHub-style releases feed.
///
/// The feed is a JSON array of releases, newest first. The first release's
/// `name` minus a fixed-length prefix (the `v` of `v1.5.3`) is the version.
#[derive(Debug, Clone)]
pub struct GithubReleases {
    url: String,
    prefix_len: usize,
    timeout: Duration,
}

#[derive(Debug, Deserialize)]
struct Release {
    name: Option<String>,
}

impl GithubReleases {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            prefix_len: 1,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Number of leading characters stripped from the release name
    pub fn prefix_len(mut self, len: usize) -> Self {
        self.prefix_len = len;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Default for GithubReleases {
    fn default() -> Self {
        Self::new(DEFAULT_RELEASES_URL)
    }
}

#[async_trait]
impl VersionSource for GithubReleases {
    async fn latest_version(&self) -> Result<String> {
        let client = reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(USER_AGENT)
            .build()?;

        let releases: Vec<Release> = client
            .get(&self.url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let name = releases
            .into_iter()
            .next()
            .ok_or_else(|| Error::ReleaseFeed("release list is empty".to_string()))?
            .name
            .ok_or_else(|| Error::ReleaseFeed("latest release has no name".to_string()))?;

        let version = strip_tag(&name, self.prefix_len);
        if version.is_empty() {
            return Err(Error::ReleaseFeed(format!(
                "release name '{}' is too short",
                name
            )));
        }

        Ok(version)
    }
}

/// Drop the first `prefix_len` characters of a release name
pub fn strip_tag(name: &str, prefix_len: usize) -> String {
    name.chars().skip(prefix_len).collect()
}

/// How the banner is rendered and where it is spliced in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BannerOptions {
    pub marker: String,
    pub template: String,
}

impl Default for BannerOptions {
    fn default() -> Self {
        Self {
            marker: DEFAULT_MARKER.to_string(),
            template: DEFAULT_TEMPLATE.to_string(),
        }
    }
}

impl BannerOptions {
    pub fn render_banner(&self, version: &str) -> String {
        self.template.replace("{version}", version)
    }
}

/// Replace everything before the marker's line with `banner`.
pub fn rewrite_banner(content: &str, marker: &str, banner: &str) -> Result<String> {
    let marker_at = content
        .find(marker)
        .ok_or_else(|| Error::Patch(format!("marker '{}' not found", marker)))?;
    let line_start = content[..marker_at].rfind('\n').map_or(0, |i| i + 1);

    let mut patched = String::with_capacity(banner.len() + 1 + content.len() - line_start);
    patched.push_str(banner);
    patched.push('\n');
    patched.push_str(&content[line_start..]);
    Ok(patched)
}

/// Patch `artifact` with a banner for the latest released version.
///
/// Returns the version written. On error the artifact is untouched.
pub async fn patch_banner(
    artifact: &Path,
    source: &dyn VersionSource,
    options: &BannerOptions,
) -> Result<String> {
    let content = tokio::fs::read_to_string(artifact)
        .await
        .map_err(|e| Error::io(format!("Failed to read '{}'", artifact.display()), e))?;

    let version = source.latest_version().await?;
    let patched = rewrite_banner(&content, &options.marker, &options.render_banner(&version))?;
    write_atomic(artifact, patched.as_bytes())?;

    tracing::info!(path = %artifact.display(), %version, "patched banner");
    Ok(version)
}

/// A configured banner patch, ready to run after the builds settle
#[derive(Debug, Clone)]
pub struct BannerPatch {
    pub artifact: PathBuf,
    pub options: BannerOptions,
    source: Arc<dyn VersionSource>,
}

impl BannerPatch {
    pub fn new(artifact: impl Into<PathBuf>, source: Arc<dyn VersionSource>) -> Self {
        Self {
            artifact: artifact.into(),
            options: BannerOptions::default(),
            source,
        }
    }

    pub fn with_options(mut self, options: BannerOptions) -> Self {
        self.options = options;
        self
    }

    pub async fn apply(&self) -> Result<String> {
        patch_banner(&self.artifact, self.source.as_ref(), &self.options).await
    }
}
