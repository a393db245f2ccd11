//! Logging setup for the Patchwork CLI.
//!
//! Library events from `patchwork-bundler` and the CLI itself go through one
//! `tracing` subscriber writing to stderr, so stdout stays clean for
//! `patchwork natives`.
//!
//! # Example
//!
//! ```rust,no_run
//! use patchwork_cli::logger::init_logger;
//! use tracing::info;
//!
//! init_logger(false, false, false);
//! info!("Starting build");
//! ```

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter used with `--verbose`
pub const VERBOSE_FILTER: &str = "patchwork=debug,patchwork_bundler=debug,patchwork_cli=debug";

/// Filter used with `--quiet`
pub const QUIET_FILTER: &str = "patchwork=error,patchwork_bundler=error,patchwork_cli=error";

/// Filter used when neither flag nor `RUST_LOG` is set
pub const DEFAULT_FILTER: &str = "patchwork=info,patchwork_bundler=info,patchwork_cli=info";

/// Initialize the tracing subscriber.
///
/// The level is picked in this order:
/// 1. `--verbose`: debug for patchwork crates
/// 2. `--quiet`: errors only
/// 3. `RUST_LOG`
/// 4. info for patchwork crates
pub fn init_logger(verbose: bool, quiet: bool, no_color: bool) {
    init_logger_with_filter(filter_for(verbose, quiet), no_color);
}

/// Initialize the subscriber with an explicit filter.
pub fn init_logger_with_filter(filter: EnvFilter, no_color: bool) {
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .with_ansi(!no_color)
        .compact();

    // A second init (tests, embedding) keeps the first subscriber
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}

fn filter_for(verbose: bool, quiet: bool) -> EnvFilter {
    if verbose {
        EnvFilter::new(VERBOSE_FILTER)
    } else if quiet {
        EnvFilter::new(QUIET_FILTER)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
    }
}
