//! Plugin natives discovery and the `~pluginNatives` virtual module.
//!
//! Each immediate subdirectory of `src/plugins` and `src/userplugins` is a
//! plugin. A plugin opts into running code in the host process by providing
//! `native.ts` or `native/index.ts`. This module scans for those files and
//! synthesizes a module that imports every native entry and exports them in
//! one object keyed by display name:
//!
//! ```text
//! import * as p0 from "/project/src/plugins/fooBar/native";
//! import * as p1 from "/project/src/userplugins/baz.discordDesktop/native";
//! export default {
//!     "FooBar": p0,
//!     "Baz": p1,
//! };
//! ```
//!
//! Missing roots and plugins without a native entry are skipped silently.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;

/// Reserved import specifier served by the natives plugin
pub const NATIVES_SPECIFIER: &str = "~pluginNatives";

/// Private module id the specifier resolves to
pub const NATIVES_MODULE_ID: &str = "\0~pluginNatives";

/// Plugin roots under the source root, in scan order
pub const PLUGIN_ROOTS: [&str; 2] = ["plugins", "userplugins"];

/// Extensions the bundler's resolver tries for an extensionless import
const NATIVE_EXTENSIONS: [&str; 3] = ["ts", "tsx", "js"];

/// A plugin that provides a native entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeModule {
    /// Plugin directory name, e.g. `fooBar.discordDesktop`
    pub dir_name: String,
    /// Key in the exported object, e.g. `FooBar`
    pub display_name: String,
    /// Local binding in the generated import
    pub alias: String,
    /// Import path relative to the source root, e.g. `./plugins/fooBar/native`
    pub import_path: String,
    /// The native entry file that was found
    pub entry_file: PathBuf,
}

/// The synthesized `~pluginNatives` module
#[derive(Debug, Clone)]
pub struct NativesModule {
    modules: IndexMap<String, NativeModule>,
    resolve_dir: PathBuf,
}

impl NativesModule {
    /// Empty module whose relative imports resolve against `resolve_dir`
    pub fn new(resolve_dir: impl Into<PathBuf>) -> Self {
        Self {
            modules: IndexMap::new(),
            resolve_dir: resolve_dir.into(),
        }
    }

    /// Add a native module.
    ///
    /// A display name that is already present is replaced in place: the later
    /// plugin wins, the earlier import is dropped. Returns the replaced entry.
    pub fn insert(&mut self, module: NativeModule) -> Option<NativeModule> {
        let replaced = self.modules.insert(module.display_name.clone(), module);
        if let Some(previous) = &replaced {
            tracing::warn!(
                display_name = %previous.display_name,
                replaced = %previous.dir_name,
                "plugin natives display name collision, keeping the later plugin"
            );
        }
        replaced
    }

    pub fn get(&self, display_name: &str) -> Option<&NativeModule> {
        self.modules.get(display_name)
    }

    pub fn display_names(&self) -> impl Iterator<Item = &str> {
        self.modules.keys().map(String::as_str)
    }

    pub fn modules(&self) -> impl Iterator<Item = &NativeModule> {
        self.modules.values()
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    pub fn resolve_dir(&self) -> &Path {
        &self.resolve_dir
    }

    /// Import specifier for `module`, anchored at the resolve directory.
    ///
    /// The virtual module has no directory of its own, so relative paths are
    /// joined here instead of being left to the resolver.
    pub fn specifier(&self, module: &NativeModule) -> String {
        let relative = module
            .import_path
            .strip_prefix("./")
            .unwrap_or(&module.import_path);
        self.resolve_dir
            .join(relative)
            .to_string_lossy()
            .replace('\\', "/")
    }

    /// Render the module source text.
    pub fn render(&self) -> String {
        let mut code = String::new();

        for module in self.modules.values() {
            code.push_str(&format!(
                "import * as {} from {};\n",
                module.alias,
                js_string(&self.specifier(module))
            ));
        }

        code.push_str("export default {\n");
        for module in self.modules.values() {
            code.push_str(&format!(
                "    {}: {},\n",
                js_string(&module.display_name),
                module.alias
            ));
        }
        code.push_str("};\n");

        code
    }
}

/// Derive the display name for a plugin directory.
///
/// The last dot-separated segment is a build-target qualifier and is dropped
/// when there is more than one segment. The first character of the directory
/// name is uppercased and replaces the first character of what remains, so a
/// name whose kept part is empty (`.x`) still yields a key (`.`).
///
/// ```
/// use patchwork_bundler::natives::display_name;
///
/// assert_eq!(display_name("foo.discordDesktop").as_deref(), Some("Foo"));
/// assert_eq!(display_name("pluginName.thing.desktop").as_deref(), Some("PluginName.thing"));
/// assert_eq!(display_name("Foo").as_deref(), Some("Foo"));
/// ```
pub fn display_name(dir_name: &str) -> Option<String> {
    let segments: Vec<&str> = dir_name.split('.').collect();
    let kept = if segments.len() > 1 {
        &segments[..segments.len() - 1]
    } else {
        &segments[..]
    };
    let joined = kept.join(".");

    let first = dir_name.chars().next()?;
    Some(first.to_uppercase().chain(joined.chars().skip(1)).collect())
}

/// Scan both plugin roots under `src_root` and build the natives module.
pub fn scan_natives(src_root: impl AsRef<Path>) -> NativesModule {
    let src_root = src_root.as_ref();
    let mut natives = NativesModule::new(src_root);
    let mut next_alias = 0usize;

    for root_name in PLUGIN_ROOTS {
        let root = src_root.join(root_name);

        for dir_name in plugin_dirs(&root) {
            let Some(entry_file) = find_native_entry(&root.join(&dir_name)) else {
                continue;
            };
            let Some(display_name) = display_name(&dir_name) else {
                continue;
            };

            tracing::debug!(
                plugin = %dir_name,
                display_name = %display_name,
                entry = %entry_file.display(),
                "found plugin native"
            );

            natives.insert(NativeModule {
                import_path: format!("./{}/{}/native", root_name, dir_name),
                alias: format!("p{}", next_alias),
                dir_name,
                display_name,
                entry_file,
            });
            next_alias += 1;
        }
    }

    natives
}

/// Immediate subdirectories of `root`, sorted by name.
///
/// A root that is missing or unreadable yields nothing.
pub fn plugin_dirs(root: &Path) -> Vec<String> {
    let entries = match std::fs::read_dir(root) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::debug!(root = %root.display(), error = %e, "skipping plugin root");
            return Vec::new();
        }
    };

    let mut dirs: Vec<String> = entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().is_dir())
        .filter_map(|entry| entry.file_name().to_str().map(str::to_string))
        .collect();
    dirs.sort();
    dirs
}

/// Locate `native.<ext>` or `native/index.<ext>` inside a plugin directory.
pub fn find_native_entry(plugin_dir: &Path) -> Option<PathBuf> {
    let direct = NATIVE_EXTENSIONS
        .iter()
        .map(|ext| plugin_dir.join(format!("native.{}", ext)));
    let nested = NATIVE_EXTENSIONS
        .iter()
        .map(|ext| plugin_dir.join("native").join(format!("index.{}", ext)));

    direct.chain(nested).find(|candidate| candidate.is_file())
}

fn js_string(value: &str) -> String {
    serde_json::Value::String(value.to_string()).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn plugin(src: &Path, root: &str, name: &str, native: Option<&str>) {
        let dir = src.join(root).join(name);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("index.ts"), "export default {};").unwrap();
        if let Some(rel) = native {
            let path = dir.join(rel);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, "export function ping() { return 1; }").unwrap();
        }
    }

    #[test]
    fn test_display_name_rules() {
        assert_eq!(display_name("foo").as_deref(), Some("Foo"));
        assert_eq!(display_name("foo.discordDesktop").as_deref(), Some("Foo"));
        assert_eq!(
            display_name("pluginName.thing.desktop").as_deref(),
            Some("PluginName.thing")
        );
        assert_eq!(display_name("").as_deref(), None);
        assert_eq!(display_name(".hidden").as_deref(), Some("."));
        assert_eq!(display_name("a.").as_deref(), Some("A"));
    }

    #[test]
    fn test_dot_prefixed_plugin_keeps_a_key() {
        let temp = TempDir::new().unwrap();
        plugin(temp.path(), "plugins", ".x", Some("native.ts"));

        let natives = scan_natives(temp.path());
        let names: Vec<_> = natives.display_names().collect();
        assert_eq!(names, ["."]);
        assert!(natives.render().contains("\".\": p0,"));
    }

    #[test]
    fn test_display_name_idempotent() {
        let once = display_name("foo").unwrap();
        assert_eq!(once, "Foo");
        assert_eq!(display_name(&once).as_deref(), Some("Foo"));
    }

    #[test]
    fn test_only_plugins_with_natives_are_exported() {
        let temp = TempDir::new().unwrap();
        let src = temp.path();
        plugin(src, "plugins", "a", Some("native.ts"));
        plugin(src, "plugins", "b.discordDesktop", Some("native/index.ts"));
        plugin(src, "plugins", "c", None);

        let natives = scan_natives(src);
        let names: Vec<_> = natives.display_names().collect();
        assert_eq!(names, ["A", "B"]);
        assert!(natives.get("C").is_none());

        let b = natives.get("B").unwrap();
        assert_eq!(b.dir_name, "b.discordDesktop");
        assert_eq!(b.import_path, "./plugins/b.discordDesktop/native");
        assert!(b.entry_file.ends_with("native/index.ts"));
    }

    #[test]
    fn test_missing_roots_yield_nothing() {
        let temp = TempDir::new().unwrap();
        let natives = scan_natives(temp.path().join("does-not-exist"));
        assert!(natives.is_empty());
        assert!(plugin_dirs(&temp.path().join("nope")).is_empty());
        assert_eq!(natives.render(), "export default {\n};\n");
    }

    #[test]
    fn test_userplugins_scanned_after_plugins() {
        let temp = TempDir::new().unwrap();
        let src = temp.path();
        plugin(src, "userplugins", "alpha", Some("native.ts"));
        plugin(src, "plugins", "zeta", Some("native.ts"));

        let natives = scan_natives(src);
        let names: Vec<_> = natives.display_names().collect();
        assert_eq!(names, ["Zeta", "Alpha"]);
        assert_eq!(natives.get("Zeta").unwrap().alias, "p0");
        assert_eq!(natives.get("Alpha").unwrap().alias, "p1");
        assert_eq!(
            natives.get("Alpha").unwrap().import_path,
            "./userplugins/alpha/native"
        );
    }

    #[test]
    fn test_collision_last_scanned_wins() {
        let temp = TempDir::new().unwrap();
        let src = temp.path();
        plugin(src, "plugins", "x.a", Some("native.ts"));
        plugin(src, "plugins", "x.b", Some("native.ts"));

        let natives = scan_natives(src);
        assert_eq!(natives.len(), 1);

        let x = natives.get("X").unwrap();
        assert_eq!(x.dir_name, "x.b");
        assert_eq!(x.alias, "p1");

        let code = natives.render();
        assert!(!code.contains("as p0"));
        assert!(code.contains("\"X\": p1,"));
    }

    #[test]
    fn test_files_in_root_are_not_plugins() {
        let temp = TempDir::new().unwrap();
        let src = temp.path();
        fs::create_dir_all(src.join("plugins")).unwrap();
        fs::write(src.join("plugins").join("index.ts"), "").unwrap();
        plugin(src, "plugins", "real", Some("native.ts"));

        assert_eq!(plugin_dirs(&src.join("plugins")), ["real"]);
    }

    #[test]
    fn test_render_anchors_imports_at_resolve_dir() {
        let temp = TempDir::new().unwrap();
        let src = temp.path();
        plugin(src, "plugins", "foo", Some("native.ts"));

        let natives = scan_natives(src);
        let code = natives.render();
        let anchored = src
            .join("plugins/foo/native")
            .to_string_lossy()
            .replace('\\', "/");

        assert!(code.starts_with("import * as p0 from "));
        assert!(code.contains(&format!("{};\n", js_string(&anchored))));
        assert!(code.ends_with("export default {\n    \"Foo\": p0,\n};\n"));
    }

    #[test]
    fn test_only_resolvable_extensions_count() {
        let temp = TempDir::new().unwrap();
        let src = temp.path();
        plugin(src, "plugins", "legacy", Some("native/index.js"));
        plugin(src, "plugins", "modern", Some("native.mjs"));
        plugin(src, "plugins", "nested", Some("native/index.mjs"));

        let natives = scan_natives(src);
        let names: Vec<_> = natives.display_names().collect();
        assert_eq!(names, ["Legacy"]);
        assert!(natives.get("Legacy").unwrap().entry_file.ends_with("native/index.js"));
    }

    #[test]
    fn test_find_native_entry_prefers_direct_file() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path();
        fs::create_dir_all(dir.join("native")).unwrap();
        fs::write(dir.join("native").join("index.ts"), "").unwrap();
        fs::write(dir.join("native.ts"), "").unwrap();

        assert_eq!(find_native_entry(dir), Some(dir.join("native.ts")));
    }
}
