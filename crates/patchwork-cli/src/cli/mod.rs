//! Command-line interface definition.
//!
//! - `patchwork build` - Build all six bundles, optionally watching for changes
//! - `patchwork natives` - Print the generated `~pluginNatives` module

mod commands;
mod tests;

use clap::Parser;

pub use commands::{BuildArgs, Command, NativesArgs};

/// Patchwork - builds the client mod for every desktop variant
#[derive(Parser, Debug)]
#[command(
    name = "patchwork",
    version,
    about = "Build the client mod for every desktop variant",
    long_about = "Patchwork bundles the main process, renderer and preload entry points\n\
                  for the discordDesktop and vesktop variants, generating the\n\
                  ~pluginNatives module from plugin directories along the way."
)]
pub struct Cli {
    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}
