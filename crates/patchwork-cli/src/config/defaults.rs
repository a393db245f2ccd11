use std::path::PathBuf;

use patchwork_bundler::config::DEFAULT_SOURCEMAP_SCHEME;
use patchwork_bundler::patch::{DEFAULT_MARKER, DEFAULT_RELEASES_URL, DEFAULT_TEMPLATE, DEFAULT_TIMEOUT};

/// Config file looked up in the project root
pub const CONFIG_FILE_NAME: &str = "patchwork.config.json";

pub fn default_out_dir() -> PathBuf {
    PathBuf::from("dist")
}

pub fn default_sourcemap_scheme() -> String {
    DEFAULT_SOURCEMAP_SCHEME.to_string()
}

pub fn default_debounce_ms() -> u64 {
    100
}

pub fn default_true() -> bool {
    true
}

pub fn default_banner_artifact() -> PathBuf {
    PathBuf::from("vencordDesktopMain.js")
}

pub fn default_releases_url() -> String {
    DEFAULT_RELEASES_URL.to_string()
}

pub fn default_tag_prefix_length() -> usize {
    1
}

pub fn default_marker() -> String {
    DEFAULT_MARKER.to_string()
}

pub fn default_template() -> String {
    DEFAULT_TEMPLATE.to_string()
}

pub fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT.as_secs()
}
