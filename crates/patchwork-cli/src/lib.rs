//! Patchwork CLI - builds the client mod for every desktop variant.
//!
//! This crate is the command-line front end for `patchwork-bundler`:
//!
//! - [`cli`] - Argument definitions
//! - [`config`] - Layered configuration (defaults, file, environment, flags)
//! - [`commands`] - `build` and `natives`
//! - [`watch`] - Rebuild loop for `build --watch`
//! - [`error`] - Error types and miette conversion
//! - [`logger`] - tracing subscriber setup
//! - [`ui`] - Status lines and build summaries on stderr
//!
//! # Example
//!
//! ```rust,no_run
//! use patchwork_cli::{error::Result, logger};
//!
//! fn main() -> Result<()> {
//!     logger::init_logger(false, false, false);
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logger;
pub mod ui;
pub mod watch;

pub use error::{BuildError, CliError, ConfigError, Result, ResultExt};
