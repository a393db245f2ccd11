//! Rolldown execution for a single build target.
//!
//! Translates a [`BuildTarget`] plus the shared [`BuildConfig`] into Rolldown
//! options, runs the bundler in memory, and hands the entry chunk and its
//! source map to the writer.

use async_trait::async_trait;
use rolldown::{
    BundlerBuilder, BundlerOptions, InputItem, IsExternal, OutputFormat, Platform,
    RawMinifyOptions, SourceMapType,
};
use rolldown_plugin::__inner::SharedPluginable;
use std::sync::Arc;

use super::{BuildBackend, BuiltArtifact, writer};
use crate::config::BuildConfig;
use crate::defines::Defines;
use crate::plugins::NativesPlugin;
use crate::target::{BuildTarget, ModuleFormat};
use crate::{Error, Result};

/// Build backend that bundles with Rolldown
#[derive(Debug, Clone)]
pub struct RolldownBackend {
    /// Shared by every target that serves `~pluginNatives`
    natives: Arc<NativesPlugin>,
}

impl RolldownBackend {
    /// Create a backend whose natives plugin scans under `src_root`
    pub fn new(src_root: impl Into<std::path::PathBuf>) -> Self {
        Self {
            natives: Arc::new(NativesPlugin::new(src_root)),
        }
    }

    pub fn for_config(config: &BuildConfig) -> Self {
        Self::new(config.src_root())
    }

    fn plugins_for(&self, target: &BuildTarget) -> Vec<SharedPluginable> {
        let mut plugins = Vec::new();
        if target.natives {
            let natives: SharedPluginable = self.natives.clone();
            plugins.push(natives);
        }
        plugins
    }
}

#[async_trait]
impl BuildBackend for RolldownBackend {
    async fn build(&self, target: &BuildTarget, config: &BuildConfig) -> Result<BuiltArtifact> {
        let options = configure_rolldown_options(target, config);

        let mut bundler = BundlerBuilder::default()
            .with_options(options)
            .with_plugins(self.plugins_for(target))
            .build()
            .map_err(|e| Error::from_rolldown_batch(target.id(), &e))?;

        let output = bundler
            .generate()
            .await
            .map_err(|e| Error::from_rolldown_batch(target.id(), &e))?;

        if !output.warnings.is_empty() {
            tracing::warn!(
                target = %target.id(),
                count = output.warnings.len(),
                "bundler reported warnings"
            );
        }

        // Dynamic imports are inlined, so there is one JS chunk and at most one map
        let mut code = None;
        let mut sourcemap = None;
        for item in &output.assets {
            let filename = item.filename();
            if filename.ends_with(".map") {
                sourcemap.get_or_insert_with(|| item.content_as_bytes().to_vec());
            } else if filename.ends_with(".js") && code.is_none() {
                code = Some(item.content_as_bytes().to_vec());
            }
        }

        let code = code.ok_or_else(|| Error::MissingEntryChunk(target.id()))?;
        writer::write_artifact(target, config, &code, sourcemap.as_deref())
    }
}

/// Configure Rolldown options for one target.
pub(crate) fn configure_rolldown_options(
    target: &BuildTarget,
    config: &BuildConfig,
) -> BundlerOptions {
    let mut options = BundlerOptions {
        input: Some(vec![InputItem {
            name: Some(target.kind.name().to_string()),
            import: target.entry.to_string_lossy().into_owned(),
        }]),
        cwd: Some(config.project_root.clone()),
        format: Some(match target.format {
            ModuleFormat::Cjs => OutputFormat::Cjs,
            ModuleFormat::Iife => OutputFormat::Iife,
        }),
        platform: Some(if target.kind.is_node() {
            Platform::Node
        } else {
            Platform::Browser
        }),
        // Watch builds keep maps inline; otherwise the map is written next to
        // the artifact and referenced from our own footer
        sourcemap: Some(if config.watch {
            SourceMapType::Inline
        } else {
            SourceMapType::Hidden
        }),
        inline_dynamic_imports: Some(true),
        ..Default::default()
    };

    options.external = Some(IsExternal::from(target.external.clone()));

    if let Some(name) = &target.global_name {
        options.name = Some(name.clone());
    }

    if config.should_minify() {
        options.minify = Some(RawMinifyOptions::from(true));
    }

    let defines = Defines::for_variant(config, target.variant);
    options.define = Some(defines.into_iter().collect());

    options
}
