//! Natives command: print the `~pluginNatives` module a build would see.

use crate::cli::NativesArgs;
use crate::commands::utils;
use crate::error::Result;
use crate::ui;
use patchwork_bundler::{BuildConfig, scan_natives};
use std::io::Write;

/// Execute the natives command.
///
/// The generated source goes to stdout; the plugin list goes to stderr so
/// the output can be piped straight into a file.
pub fn execute(args: NativesArgs) -> Result<()> {
    let root = utils::resolve_project_root(args.cwd.as_deref())?;
    let src_root = BuildConfig::new(&root).src_root();
    utils::ensure_src_root(&src_root)?;

    let natives = scan_natives(&src_root);

    let mut stdout = std::io::stdout().lock();
    stdout.write_all(natives.render().as_bytes())?;
    stdout.flush()?;

    for module in natives.modules() {
        tracing::debug!(
            plugin = %module.dir_name,
            entry = %module.entry_file.display(),
            "native module"
        );
    }

    if natives.is_empty() {
        ui::info("No plugin natives found");
    } else {
        let names: Vec<&str> = natives.display_names().collect();
        ui::info(&format!("{} plugin natives: {}", names.len(), names.join(", ")));
    }

    Ok(())
}
