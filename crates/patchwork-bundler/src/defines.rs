//! Compile-time constants substituted into every bundle.
//!
//! Values are JavaScript source text: booleans render as `true`/`false`,
//! strings as JSON string literals, numbers as plain digits.

use indexmap::IndexMap;

use crate::config::BuildConfig;
use crate::target::Variant;

/// Ordered map of identifier → replacement source text
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Defines {
    entries: IndexMap<String, String>,
}

impl Defines {
    /// Constants for one variant.
    ///
    /// `process.platform` is only pinned for host-tied builds; standalone
    /// bundles keep the runtime lookup.
    pub fn for_variant(config: &BuildConfig, variant: Variant) -> Self {
        let mut defines = Self::default();

        defines.set_bool("IS_DISCORD_DESKTOP", variant == Variant::DiscordDesktop);
        defines.set_bool("IS_VESKTOP", variant == Variant::Vesktop);
        defines.set_bool("IS_STANDALONE", config.standalone);
        defines.set_bool("IS_DEV", config.is_dev());
        defines.set_bool("IS_UPDATER_DISABLED", config.is_updater_disabled());
        defines.set_string("VERSION", &config.version);
        defines.set("BUILD_TIMESTAMP", config.build_timestamp.to_string());

        if !config.standalone {
            defines.set_string("process.platform", node_platform());
        }

        defines
    }

    /// Set a raw replacement
    pub fn set(&mut self, key: impl Into<String>, source: impl Into<String>) {
        self.entries.insert(key.into(), source.into());
    }

    pub fn set_bool(&mut self, key: impl Into<String>, value: bool) {
        self.set(key, if value { "true" } else { "false" });
    }

    /// Set a string constant, quoted as a JSON literal
    pub fn set_string(&mut self, key: impl Into<String>, value: &str) {
        self.set(key, serde_json::Value::String(value.to_string()).to_string());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl IntoIterator for Defines {
    type Item = (String, String);
    type IntoIter = indexmap::map::IntoIter<String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Node's name for the platform this build runs on
pub fn node_platform() -> &'static str {
    match std::env::consts::OS {
        "macos" => "darwin",
        "windows" => "win32",
        other => other,
    }
}
