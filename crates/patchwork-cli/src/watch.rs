//! Watch mode: rebuild every target when a source file changes.
//!
//! The watcher observes the source root recursively. Events for the same
//! path inside the debounce window are dropped in the notify callback, and a
//! burst of events across files collapses into one rebuild. Rebuilds run
//! inline in the event loop, so two never overlap.

use crate::error::{CliError, Result, ResultExt};
use crate::ui;
use notify::{Event, RecommendedWatcher, RecursiveMode, Watcher};
use patchwork_bundler::Orchestrator;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tokio::signal;
use tokio::sync::mpsc;

/// Directories never worth a rebuild
pub const DEFAULT_IGNORE: [&str; 2] = ["node_modules", "*.tmp"];

/// File change event type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileChange {
    Modified(PathBuf),
    Created(PathBuf),
    Removed(PathBuf),
}

impl FileChange {
    /// Get the path affected by this change.
    pub fn path(&self) -> &Path {
        match self {
            FileChange::Modified(p) | FileChange::Created(p) | FileChange::Removed(p) => p,
        }
    }
}

/// File watcher with debouncing and filtering.
pub struct FileWatcher {
    _watcher: RecommendedWatcher,
    root: PathBuf,
}

impl FileWatcher {
    /// Watch `root` recursively, sending filtered changes to the returned receiver.
    pub fn new(
        root: PathBuf,
        ignore_patterns: Vec<String>,
        debounce: Duration,
    ) -> Result<(Self, mpsc::Receiver<FileChange>)> {
        if !root.exists() {
            return Err(CliError::FileNotFound(root));
        }

        let (tx, rx) = mpsc::channel(100);
        let mut last_event: Option<(PathBuf, Instant)> = None;
        let callback_root = root.clone();

        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
            let Ok(event) = res else {
                return;
            };

            for path in &event.paths {
                if Self::should_ignore(path, &callback_root, &ignore_patterns) {
                    continue;
                }

                let now = Instant::now();
                if let Some((last_path, last_time)) = &last_event {
                    if last_path == path && now.duration_since(*last_time) < debounce {
                        continue;
                    }
                }
                last_event = Some((path.clone(), now));

                let change = match event.kind {
                    notify::EventKind::Create(_) => FileChange::Created(path.clone()),
                    notify::EventKind::Modify(_) => FileChange::Modified(path.clone()),
                    notify::EventKind::Remove(_) => FileChange::Removed(path.clone()),
                    _ => continue,
                };

                // Receiver gone means the loop exited
                let _ = tx.blocking_send(change);
            }
        })?;

        watcher.watch(&root, RecursiveMode::Recursive)?;

        Ok((
            Self {
                _watcher: watcher,
                root,
            },
            rx,
        ))
    }

    /// Whether a path is outside the root, hidden, or matches an ignore pattern.
    ///
    /// Patterns starting with `*` match a suffix; anything else matches a
    /// path component.
    fn should_ignore(path: &Path, root: &Path, ignore_patterns: &[String]) -> bool {
        let Ok(rel_path) = path.strip_prefix(root) else {
            return true;
        };
        let path_str = rel_path.to_string_lossy();

        for pattern in ignore_patterns {
            if let Some(suffix) = pattern.strip_prefix('*') {
                if path_str.ends_with(suffix) {
                    return true;
                }
            } else if rel_path.components().any(|c| c.as_os_str() == pattern.as_str()) {
                return true;
            }
        }

        rel_path.components().any(|component| {
            component
                .as_os_str()
                .to_str()
                .is_some_and(|name| name.starts_with('.') && name != "." && name != "..")
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

/// Watch the source root and rebuild until Ctrl+C.
///
/// The initial build has already run; `orchestrator` should not carry the
/// banner patch, which only applies to the first build.
pub async fn run(orchestrator: &Orchestrator, debounce: Duration) -> Result<()> {
    let src_root = orchestrator.config().src_root();
    let ignore = DEFAULT_IGNORE.iter().map(|p| p.to_string()).collect();

    let (watcher, mut changes) =
        FileWatcher::new(src_root, ignore, debounce).context("Failed to start watcher")?;

    ui::info(&format!(
        "Watching for changes in {} (Ctrl+C to stop)",
        watcher.root().display()
    ));

    watch_loop(orchestrator, &mut changes, watcher.root(), debounce, signal::ctrl_c()).await;
    Ok(())
}

/// Rebuild on every settled burst of changes until `shutdown` completes.
///
/// `shutdown` is polled during rebuilds too, so an interrupt never waits for
/// a slow build to finish.
async fn watch_loop<F: Future>(
    orchestrator: &Orchestrator,
    changes: &mut mpsc::Receiver<FileChange>,
    root: &Path,
    debounce: Duration,
    shutdown: F,
) {
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            Some(change) = changes.recv() => {
                let rebuild = async {
                    // Let a save burst settle, then rebuild once for all of it
                    tokio::time::sleep(debounce).await;
                    let mut extra = 0usize;
                    while changes.try_recv().is_ok() {
                        extra += 1;
                    }

                    tracing::debug!(path = %change.path().display(), extra, "source changed");
                    ui::info(&format!("Changed: {}", display_relative(change.path(), root)));

                    orchestrator.run().await
                };

                tokio::select! {
                    report = rebuild => crate::commands::build::print_report(&report),
                    _ = &mut shutdown => {
                        ui::info("Stopping watch mode, abandoning rebuild");
                        break;
                    }
                }
            }

            _ = &mut shutdown => {
                ui::info("Stopping watch mode");
                break;
            }
        }
    }
}

fn display_relative(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .display()
        .to_string()
}
