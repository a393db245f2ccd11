//! Configuration for the Patchwork CLI.
//!
//! Merges settings from defaults, `patchwork.config.json`, environment
//! variables and command-line flags, in that order of increasing priority.

mod defaults;
mod loading;
mod validation;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use patchwork_bundler::{BannerOptions, BannerPatch, BuildConfig, GithubReleases};

pub use defaults::*;

/// Patchwork configuration - loaded from patchwork.config.json, env and flags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PatchworkConfig {
    /// Output directory, relative to the project root
    #[serde(default = "default_out_dir")]
    pub out_dir: PathBuf,

    /// Rebuild on change
    #[serde(default)]
    pub watch: bool,

    /// Developer build
    #[serde(default)]
    pub dev: bool,

    /// Standalone build
    #[serde(default)]
    pub standalone: bool,

    /// Disable the updater
    #[serde(default)]
    pub disable_updater: bool,

    /// Force minification on or off; unset follows dev mode
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minify: Option<bool>,

    /// Version override; unset reads package.json
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// Build timestamp override in milliseconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_timestamp: Option<i64>,

    /// Scheme prefix for sourceMappingURL footers
    #[serde(default = "default_sourcemap_scheme")]
    pub sourcemap_scheme: String,

    /// Watch mode debounce in milliseconds
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Post-build banner patch
    #[serde(default)]
    pub banner: BannerConfig,
}

/// Settings for the post-build banner patch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct BannerConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Artifact to patch, relative to the output directory
    #[serde(default = "default_banner_artifact")]
    pub artifact: PathBuf,

    /// Releases feed returning a JSON array, newest first
    #[serde(default = "default_releases_url")]
    pub releases_url: String,

    /// Characters stripped from the release name (the `v` in `v1.2.3`)
    #[serde(default = "default_tag_prefix_length")]
    pub tag_prefix_length: usize,

    /// Line the banner is inserted in front of
    #[serde(default = "default_marker")]
    pub marker: String,

    /// Banner text; `{version}` is replaced
    #[serde(default = "default_template")]
    pub template: String,

    /// Feed request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for BannerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            artifact: default_banner_artifact(),
            releases_url: default_releases_url(),
            tag_prefix_length: default_tag_prefix_length(),
            marker: default_marker(),
            template: default_template(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for PatchworkConfig {
    fn default() -> Self {
        Self {
            out_dir: default_out_dir(),
            watch: false,
            dev: false,
            standalone: false,
            disable_updater: false,
            minify: None,
            version: None,
            build_timestamp: None,
            sourcemap_scheme: default_sourcemap_scheme(),
            debounce_ms: default_debounce_ms(),
            banner: BannerConfig::default(),
        }
    }
}

impl PatchworkConfig {
    /// Library build configuration for the project at `root`.
    pub fn to_build_config(&self, root: &Path) -> BuildConfig {
        let mut config = BuildConfig::new(root)
            .output_dir(&self.out_dir)
            .watch(self.watch)
            .dev(self.dev)
            .standalone(self.standalone)
            .disable_updater(self.disable_updater)
            .sourcemap_scheme(&self.sourcemap_scheme);

        if let Some(minify) = self.minify {
            config = config.minify(minify);
        }
        if let Some(version) = &self.version {
            config = config.version(version);
        }
        if let Some(timestamp) = self.build_timestamp {
            config = config.build_timestamp(timestamp);
        }

        config
    }

    /// The banner patch to run after builds, if enabled.
    pub fn banner_patch(&self, build: &BuildConfig) -> Option<BannerPatch> {
        if !self.banner.enabled {
            return None;
        }

        let source = GithubReleases::new(&self.banner.releases_url)
            .prefix_len(self.banner.tag_prefix_length)
            .timeout(Duration::from_secs(self.banner.timeout_secs));

        let patch = BannerPatch::new(build.out_dir().join(&self.banner.artifact), Arc::new(source))
            .with_options(BannerOptions {
                marker: self.banner.marker.clone(),
                template: self.banner.template.clone(),
            });

        Some(patch)
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}
