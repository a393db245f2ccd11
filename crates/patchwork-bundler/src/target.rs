//! Build target types.
//!
//! This module defines the six fixed build targets:
//! - `Variant`: which product the bundle is for
//! - `EntryKind`: which process the bundle runs in
//! - `BuildTarget`: one concrete (variant, entry) pair with its output path

use std::path::{Path, PathBuf};

use crate::config::BuildConfig;
use crate::natives::NATIVES_SPECIFIER;

/// Product variant a bundle is built for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variant {
    /// The official desktop client, patched in place
    DiscordDesktop,
    /// The standalone Vesktop shell
    Vesktop,
}

impl Variant {
    /// Both variants, in build order
    pub const ALL: [Variant; 2] = [Variant::DiscordDesktop, Variant::Vesktop];

    /// Name used in logs and target ids
    pub fn name(&self) -> &'static str {
        match self {
            Self::DiscordDesktop => "discordDesktop",
            Self::Vesktop => "vesktop",
        }
    }
}

impl std::fmt::Display for Variant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Which process a bundle runs in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    /// Electron main process
    Main,
    /// Sandboxed renderer
    Renderer,
    /// Preload script bridging main and renderer
    Preload,
}

impl EntryKind {
    /// All entry kinds, in build order
    pub const ALL: [EntryKind; 3] = [EntryKind::Main, EntryKind::Renderer, EntryKind::Preload];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Main => "main",
            Self::Renderer => "renderer",
            Self::Preload => "preload",
        }
    }

    /// Entry module, relative to the project root
    pub fn entry_point(&self) -> &'static str {
        match self {
            Self::Main => "src/main/index.ts",
            Self::Renderer => "src/Vencord.ts",
            Self::Preload => "src/preload.ts",
        }
    }

    /// Main and preload run under Node; the renderer runs in the page
    pub fn is_node(&self) -> bool {
        !matches!(self, Self::Renderer)
    }
}

/// Output module format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleFormat {
    /// CommonJS, for the Node-side bundles
    Cjs,
    /// Immediately invoked function expression, for the renderer
    Iife,
}

/// A single bundling task
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildTarget {
    pub variant: Variant,
    pub kind: EntryKind,
    /// Absolute entry module path
    pub entry: PathBuf,
    /// Absolute output file path
    pub outfile: PathBuf,
    pub format: ModuleFormat,
    /// Label emitted as `//# sourceURL=` for debugger attribution
    pub source_url: String,
    /// Global binding for IIFE output
    pub global_name: Option<String>,
    /// Whether the natives plugin serves `~pluginNatives` for this target
    pub natives: bool,
    /// Specifiers left to the host at runtime
    pub external: Vec<String>,
}

impl BuildTarget {
    /// Create the target for one (variant, entry) pair
    pub fn new(variant: Variant, kind: EntryKind, config: &BuildConfig) -> Self {
        let root = config.project_root.as_path();
        let file_stem = output_stem(variant, kind);

        let external = if kind.is_node() {
            let mut external = vec!["electron".to_string(), "original-fs".to_string()];
            if kind == EntryKind::Preload {
                external.push(NATIVES_SPECIFIER.to_string());
            }
            external
        } else {
            Vec::new()
        };

        Self {
            variant,
            kind,
            entry: root.join(kind.entry_point()),
            outfile: config.out_dir().join(format!("{}.js", file_stem)),
            format: if kind.is_node() {
                ModuleFormat::Cjs
            } else {
                ModuleFormat::Iife
            },
            source_url: source_url(variant, kind).to_string(),
            global_name: (kind == EntryKind::Renderer).then(|| "Vencord".to_string()),
            natives: kind == EntryKind::Main,
            external,
        }
    }

    /// All six targets: both variants × all entry kinds
    pub fn all(config: &BuildConfig) -> Vec<BuildTarget> {
        Variant::ALL
            .iter()
            .flat_map(|variant| {
                EntryKind::ALL
                    .iter()
                    .map(move |kind| BuildTarget::new(*variant, *kind, config))
            })
            .collect()
    }

    /// Identifier like `vesktop/main`
    pub fn id(&self) -> String {
        format!("{}/{}", self.variant, self.kind.name())
    }

    /// Output file name without directories (e.g. `patcher.js`)
    pub fn file_name(&self) -> String {
        self.outfile
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Source map path written next to the artifact
    pub fn sourcemap_file(&self) -> PathBuf {
        let mut path = self.outfile.clone().into_os_string();
        path.push(".map");
        PathBuf::from(path)
    }

    /// Whether this target's output lives under `dir`
    pub fn writes_into(&self, dir: &Path) -> bool {
        self.outfile.starts_with(dir)
    }
}

fn output_stem(variant: Variant, kind: EntryKind) -> &'static str {
    match (variant, kind) {
        (Variant::DiscordDesktop, EntryKind::Main) => "patcher",
        (Variant::DiscordDesktop, EntryKind::Renderer) => "renderer",
        (Variant::DiscordDesktop, EntryKind::Preload) => "preload",
        (Variant::Vesktop, EntryKind::Main) => "vencordDesktopMain",
        (Variant::Vesktop, EntryKind::Renderer) => "vencordDesktopRenderer",
        (Variant::Vesktop, EntryKind::Preload) => "vencordDesktopPreload",
    }
}

fn source_url(variant: Variant, kind: EntryKind) -> &'static str {
    match (variant, kind) {
        (Variant::DiscordDesktop, EntryKind::Main) => "VencordPatcher",
        (Variant::DiscordDesktop, EntryKind::Renderer) => "VencordRenderer",
        (Variant::DiscordDesktop, EntryKind::Preload) => "VencordPreload",
        (Variant::Vesktop, EntryKind::Main) => "VencordDesktopMain",
        (Variant::Vesktop, EntryKind::Renderer) => "VencordDesktopRenderer",
        (Variant::Vesktop, EntryKind::Preload) => "VencordDesktopPreload",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn config() -> BuildConfig {
        BuildConfig::new("/project").version("1.0.0").build_timestamp(0)
    }

    #[test]
    fn test_six_targets_with_disjoint_outputs() {
        let targets = BuildTarget::all(&config());
        assert_eq!(targets.len(), 6);

        let outputs: HashSet<_> = targets.iter().map(|t| t.outfile.clone()).collect();
        assert_eq!(outputs.len(), 6);
        assert!(targets.iter().all(|t| t.writes_into(Path::new("/project/dist"))));
    }

    #[test]
    fn test_output_names() {
        let names: Vec<_> = BuildTarget::all(&config())
            .iter()
            .map(|t| t.file_name())
            .collect();
        assert_eq!(
            names,
            [
                "patcher.js",
                "renderer.js",
                "preload.js",
                "vencordDesktopMain.js",
                "vencordDesktopRenderer.js",
                "vencordDesktopPreload.js",
            ]
        );
    }

    #[test]
    fn test_renderer_is_iife_with_global() {
        let target = BuildTarget::new(Variant::Vesktop, EntryKind::Renderer, &config());
        assert_eq!(target.format, ModuleFormat::Iife);
        assert_eq!(target.global_name.as_deref(), Some("Vencord"));
        assert!(target.external.is_empty());
        assert!(!target.natives);
    }

    #[test]
    fn test_only_main_serves_natives() {
        let config = config();
        let main = BuildTarget::new(Variant::DiscordDesktop, EntryKind::Main, &config);
        let preload = BuildTarget::new(Variant::DiscordDesktop, EntryKind::Preload, &config);

        assert!(main.natives);
        assert!(!main.external.contains(&NATIVES_SPECIFIER.to_string()));
        assert!(!preload.natives);
        assert!(preload.external.contains(&NATIVES_SPECIFIER.to_string()));
        assert!(preload.external.contains(&"electron".to_string()));
    }

    #[test]
    fn test_target_id_and_sourcemap() {
        let target = BuildTarget::new(Variant::DiscordDesktop, EntryKind::Main, &config());
        assert_eq!(target.id(), "discordDesktop/main");
        assert_eq!(target.entry, PathBuf::from("/project/src/main/index.ts"));
        assert_eq!(
            target.sourcemap_file(),
            PathBuf::from("/project/dist/patcher.js.map")
        );
        assert_eq!(target.source_url, "VencordPatcher");
    }
}
