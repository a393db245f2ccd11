use clap::{Args, Subcommand};
use std::path::PathBuf;

/// Available Patchwork subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build all bundles
    ///
    /// Runs the six builds (main, renderer and preload for both variants)
    /// concurrently, then patches the Vesktop main bundle's banner.
    Build(BuildArgs),

    /// Print the generated ~pluginNatives module
    ///
    /// Scans src/plugins and src/userplugins the same way a build does and
    /// writes the synthesized module to stdout.
    Natives(NativesArgs),
}

/// Arguments for the build command
#[derive(Args, Debug, Clone, Default)]
pub struct BuildArgs {
    /// Rebuild whenever a source file changes
    ///
    /// Implies --dev. Source maps are inlined and build failures never
    /// change the exit status.
    #[arg(short, long)]
    pub watch: bool,

    /// Developer build (IS_DEV, no minification)
    #[arg(long)]
    pub dev: bool,

    /// Standalone build, not tied to a host install
    ///
    /// Leaves process.platform to runtime and disables the updater.
    #[arg(long)]
    pub standalone: bool,

    /// Build with IS_UPDATER_DISABLED set
    #[arg(long)]
    pub disable_updater: bool,

    /// Force minification on
    #[arg(long, conflicts_with = "no_minify")]
    pub minify: bool,

    /// Force minification off
    #[arg(long)]
    pub no_minify: bool,

    /// Skip the post-build banner patch
    #[arg(long)]
    pub no_banner: bool,

    /// Output directory, relative to the project root
    #[arg(short = 'd', long, value_name = "DIR")]
    pub out_dir: Option<PathBuf>,

    /// Project root (defaults to the current directory)
    #[arg(long, value_name = "DIR")]
    pub cwd: Option<PathBuf>,

    /// Config file (defaults to patchwork.config.json in the project root)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

impl BuildArgs {
    /// Explicit minification choice, if either flag was given
    pub fn minify_override(&self) -> Option<bool> {
        if self.minify {
            Some(true)
        } else if self.no_minify {
            Some(false)
        } else {
            None
        }
    }
}

/// Arguments for the natives command
#[derive(Args, Debug, Clone, Default)]
pub struct NativesArgs {
    /// Project root (defaults to the current directory)
    #[arg(long, value_name = "DIR")]
    pub cwd: Option<PathBuf>,
}
