//! Command implementations.
//!
//! - [`build`] - Build all targets, optionally watching
//! - [`natives`] - Print the generated `~pluginNatives` module

pub mod build;
pub mod natives;
pub(crate) mod utils;

pub use build::execute as build_execute;
pub use natives::execute as natives_execute;
