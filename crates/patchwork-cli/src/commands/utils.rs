use crate::error::{BuildError, CliError, Result, ResultExt};
use std::path::{Path, PathBuf};

/// Resolve the project root from `--cwd`, falling back to the current directory.
///
/// The result is canonical, so later joins and prefix checks compare like
/// with like.
pub(crate) fn resolve_project_root(cwd: Option<&Path>) -> Result<PathBuf> {
    let root = match cwd {
        Some(path) => path.to_path_buf(),
        None => std::env::current_dir()?,
    };

    let root = std::fs::canonicalize(&root).with_path(&root)?;
    if !root.is_dir() {
        return Err(CliError::InvalidArgument(format!(
            "--cwd must be a directory: {}",
            root.display()
        )));
    }

    Ok(root)
}

/// Fail early when the project has no `src/` directory.
pub(crate) fn ensure_src_root(src_root: &Path) -> Result<()> {
    if src_root.is_dir() {
        Ok(())
    } else {
        Err(BuildError::SourceRootMissing(src_root.to_path_buf()).into())
    }
}
