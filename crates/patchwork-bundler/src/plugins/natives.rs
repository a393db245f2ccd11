//! Natives plugin for serving `~pluginNatives` to Rolldown
//!
//! The resolve hook claims the reserved specifier and maps it to a private
//! id; the load hook rescans the plugin roots on every call and returns the
//! synthesized source. The plugin holds no state besides the source root, so
//! one instance is shared by every concurrent build.

use rolldown_common::{ModuleType, ResolvedExternal};
use rolldown_plugin::{
    HookLoadArgs, HookLoadOutput, HookLoadReturn, HookResolveIdArgs, HookResolveIdOutput,
    HookResolveIdReturn, HookUsage, Plugin, PluginContext,
};
use std::borrow::Cow;
use std::path::PathBuf;

use crate::natives::{NATIVES_MODULE_ID, NATIVES_SPECIFIER, NativesModule, scan_natives};

/// Plugin that serves the `~pluginNatives` virtual module
#[derive(Debug, Clone)]
pub struct NativesPlugin {
    /// Source root holding `plugins/` and `userplugins/`
    src_root: PathBuf,
}

impl NativesPlugin {
    pub fn new(src_root: impl Into<PathBuf>) -> Self {
        Self {
            src_root: src_root.into(),
        }
    }

    /// Whether `specifier` is the reserved natives specifier
    pub fn claims(specifier: &str) -> bool {
        specifier == NATIVES_SPECIFIER
    }

    /// Run the scan this plugin performs on load
    pub fn scan(&self) -> NativesModule {
        scan_natives(&self.src_root)
    }
}

impl Plugin for NativesPlugin {
    fn name(&self) -> Cow<'static, str> {
        "patchwork-plugin-natives".into()
    }

    fn register_hook_usage(&self) -> HookUsage {
        HookUsage::ResolveId | HookUsage::Load
    }

    /// Resolve ID hook - maps the reserved specifier to the private id
    ///
    /// Every other specifier falls through to Rolldown's resolver.
    fn resolve_id(
        &self,
        _ctx: &PluginContext,
        args: &HookResolveIdArgs,
    ) -> impl std::future::Future<Output = HookResolveIdReturn> + Send {
        let claimed = Self::claims(&args.specifier.to_string());

        async move {
            if !claimed {
                return Ok(None);
            }

            Ok(Some(HookResolveIdOutput {
                id: NATIVES_MODULE_ID.to_string().into(),
                external: Some(ResolvedExternal::Bool(false)),
                ..Default::default()
            }))
        }
    }

    /// Load hook - scans plugin roots and returns the generated module
    fn load(
        &self,
        _ctx: &PluginContext,
        args: &HookLoadArgs<'_>,
    ) -> impl std::future::Future<Output = HookLoadReturn> + Send {
        let is_natives = args.id.to_string() == NATIVES_MODULE_ID;
        let plugin = self.clone();

        async move {
            if !is_natives {
                return Ok(None);
            }

            let natives = plugin.scan();
            tracing::debug!(count = natives.len(), "generated {}", NATIVES_SPECIFIER);

            Ok(Some(HookLoadOutput {
                code: natives.render().into(),
                module_type: Some(ModuleType::Js),
                ..Default::default()
            }))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_claims_only_reserved_specifier() {
        assert!(NativesPlugin::claims("~pluginNatives"));
        assert!(!NativesPlugin::claims("~plugins"));
        assert!(!NativesPlugin::claims("./pluginNatives"));
        assert!(!NativesPlugin::claims("~pluginNatives/extra"));
    }

    #[test]
    fn test_each_scan_is_fresh() {
        let temp = TempDir::new().unwrap();
        let plugin = NativesPlugin::new(temp.path());
        assert!(plugin.scan().is_empty());

        let dir = temp.path().join("plugins").join("late");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("native.ts"), "export {};").unwrap();

        let names: Vec<_> = plugin.scan().display_names().map(str::to_string).collect();
        assert_eq!(names, ["Late"]);
    }

    #[test]
    fn test_plugin_name() {
        let plugin = NativesPlugin::new("/src");
        assert_eq!(plugin.name(), "patchwork-plugin-natives");
    }
}
