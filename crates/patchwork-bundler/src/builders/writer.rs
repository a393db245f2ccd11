//! Artifact writing.
//!
//! Every file is written to a sibling `.tmp` path and renamed into place, so
//! a host app never loads a half-written bundle.

use std::fs;
use std::path::{Path, PathBuf};

use super::BuiltArtifact;
use crate::config::BuildConfig;
use crate::target::BuildTarget;
use crate::{Error, Result};

/// Debugger attribution comments appended to an artifact.
///
/// The `sourceMappingURL` line is only emitted when an external map is
/// written, which is never the case in watch mode.
pub fn footer(target: &BuildTarget, config: &BuildConfig) -> String {
    let mut footer = format!("//# sourceURL={}\n", target.source_url);
    if !config.watch {
        footer.push_str(&format!(
            "//# sourceMappingURL={}{}.map\n",
            config.sourcemap_scheme,
            target.file_name()
        ));
    }
    footer
}

/// Write bundled code (plus footer) and its source map for `target`.
pub fn write_artifact(
    target: &BuildTarget,
    config: &BuildConfig,
    code: &[u8],
    sourcemap: Option<&[u8]>,
) -> Result<BuiltArtifact> {
    if let Some(dir) = target.outfile.parent() {
        fs::create_dir_all(dir).map_err(|e| {
            Error::WriteFailure(format!(
                "Failed to create output directory '{}': {}",
                dir.display(),
                e
            ))
        })?;
    }

    let mut content = Vec::with_capacity(code.len() + 128);
    content.extend_from_slice(code);
    if !content.ends_with(b"\n") {
        content.push(b'\n');
    }
    content.extend_from_slice(footer(target, config).as_bytes());

    write_atomic(&target.outfile, &content)?;

    let sourcemap = match sourcemap {
        Some(map) if !config.watch => {
            let path = target.sourcemap_file();
            write_atomic(&path, map)?;
            Some(path)
        }
        _ => None,
    };

    tracing::info!(
        target = %target.id(),
        path = %target.outfile.display(),
        bytes = content.len(),
        "wrote artifact"
    );

    Ok(BuiltArtifact {
        path: target.outfile.clone(),
        size: content.len() as u64,
        sourcemap,
    })
}

/// Write `bytes` to `path` through a temp file and rename.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let temp_path = temp_path_for(path);

    fs::write(&temp_path, bytes).map_err(|e| {
        Error::WriteFailure(format!(
            "Failed to write temp file '{}': {}",
            temp_path.display(),
            e
        ))
    })?;

    if let Err(e) = fs::rename(&temp_path, path) {
        let _ = fs::remove_file(&temp_path);
        return Err(Error::WriteFailure(format!(
            "Failed to rename '{}' to '{}': {}",
            temp_path.display(),
            path.display(),
            e
        )));
    }

    Ok(())
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut temp = path.as_os_str().to_os_string();
    temp.push(".tmp");
    PathBuf::from(temp)
}
