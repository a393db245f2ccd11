//! Rolldown plugins used by patchwork builds.
//!
//! - [`NativesPlugin`] serves the `~pluginNatives` virtual module

pub mod natives;

pub use natives::NativesPlugin;
