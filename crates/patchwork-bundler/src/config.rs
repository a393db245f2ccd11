//! Build configuration types.
//!
//! `BuildConfig` carries everything the six build targets share: the project
//! root, the output directory, and the switches that become compile-time
//! constants. Use the builder pattern methods for ergonomic configuration.

use std::path::{Path, PathBuf};

use crate::{Error, Result};

/// Version used when `package.json` is missing or has no `version` field
pub const FALLBACK_VERSION: &str = "0.0.0";

/// Scheme prefixed to source map URLs in artifact footers
pub const DEFAULT_SOURCEMAP_SCHEME: &str = "vencord://";

/// Build configuration shared by every target
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Project root; entry points and plugin roots live under it
    pub project_root: PathBuf,

    /// Output directory, relative to the project root unless absolute
    pub out_dir: PathBuf,

    /// Continuous-watch mode: inline source maps, failures never fail the process
    pub watch: bool,

    /// Developer mode (implied by watch)
    pub dev: bool,

    /// Standalone/portable build, not tied to a host install
    pub standalone: bool,

    /// Compile the updater out
    pub updater_disabled: bool,

    /// Explicit minification switch; defaults to "minify unless dev"
    pub minify: Option<bool>,

    /// Version string baked into every bundle
    pub version: String,

    /// Build timestamp in milliseconds since the Unix epoch
    pub build_timestamp: i64,

    /// Scheme used for `//# sourceMappingURL=` footers
    pub sourcemap_scheme: String,
}

impl BuildConfig {
    /// Create a configuration for the project at `root`.
    ///
    /// The version is read from `package.json`; the timestamp is the current time.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let project_root = root.into();
        let version = read_package_version(&project_root)
            .unwrap_or_else(|| FALLBACK_VERSION.to_string());

        Self {
            project_root,
            out_dir: PathBuf::from("dist"),
            watch: false,
            dev: false,
            standalone: false,
            updater_disabled: false,
            minify: None,
            version,
            build_timestamp: chrono::Utc::now().timestamp_millis(),
            sourcemap_scheme: DEFAULT_SOURCEMAP_SCHEME.to_string(),
        }
    }

    /// Set the output directory
    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.out_dir = dir.into();
        self
    }

    pub fn watch(mut self, watch: bool) -> Self {
        self.watch = watch;
        self
    }

    pub fn dev(mut self, dev: bool) -> Self {
        self.dev = dev;
        self
    }

    pub fn standalone(mut self, standalone: bool) -> Self {
        self.standalone = standalone;
        self
    }

    pub fn disable_updater(mut self, disabled: bool) -> Self {
        self.updater_disabled = disabled;
        self
    }

    pub fn minify(mut self, minify: bool) -> Self {
        self.minify = Some(minify);
        self
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    pub fn build_timestamp(mut self, millis: i64) -> Self {
        self.build_timestamp = millis;
        self
    }

    pub fn sourcemap_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.sourcemap_scheme = scheme.into();
        self
    }

    /// Developer mode is on when requested or when watching
    pub fn is_dev(&self) -> bool {
        self.dev || self.watch
    }

    /// Standalone builds never ship the updater
    pub fn is_updater_disabled(&self) -> bool {
        self.updater_disabled || self.standalone
    }

    pub fn should_minify(&self) -> bool {
        self.minify.unwrap_or(!self.is_dev())
    }

    /// Source root that relative plugin imports are anchored at
    pub fn src_root(&self) -> PathBuf {
        self.project_root.join("src")
    }

    /// Absolute output directory
    pub fn out_dir(&self) -> PathBuf {
        if self.out_dir.is_absolute() {
            self.out_dir.clone()
        } else {
            self.project_root.join(&self.out_dir)
        }
    }

    /// Validate configuration for logical consistency.
    pub fn validate(&self) -> Result<()> {
        if !self.project_root.is_dir() {
            return Err(Error::InvalidConfig(format!(
                "project root '{}' is not a directory",
                self.project_root.display()
            )));
        }

        if self.version.trim().is_empty() {
            return Err(Error::InvalidConfig("version cannot be empty".to_string()));
        }

        // Watch mode observes the source root; output there would retrigger it
        if self.out_dir().starts_with(self.src_root()) {
            return Err(Error::InvalidConfig(
                "output directory cannot be inside the source root".to_string(),
            ));
        }

        Ok(())
    }
}

/// Read the `version` field from `<root>/package.json`.
pub fn read_package_version(root: &Path) -> Option<String> {
    let content = std::fs::read_to_string(root.join("package.json")).ok()?;
    let manifest: serde_json::Value = serde_json::from_str(&content).ok()?;
    manifest
        .get("version")
        .and_then(|v| v.as_str())
        .map(str::to_string)
}
