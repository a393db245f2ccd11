//! Build orchestration.
//!
//! Spawns one task per [`BuildTarget`] on a tokio [`JoinSet`], waits for all
//! of them to settle, then runs the optional banner patch. Targets write to
//! disjoint paths, so the tasks share nothing but the config and backend.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinSet;

use crate::builders::{BuildBackend, BuiltArtifact, RolldownBackend};
use crate::config::BuildConfig;
use crate::patch::BannerPatch;
use crate::target::BuildTarget;
use crate::{Error, Result};

/// Result of building a single target
#[derive(Debug)]
pub struct TargetOutcome {
    pub target: BuildTarget,
    pub result: Result<BuiltArtifact>,
}

/// Aggregate result of one orchestrator run
#[derive(Debug)]
pub struct BuildReport {
    /// One outcome per target, in target order
    pub outcomes: Vec<TargetOutcome>,
    pub duration: Duration,
    /// Version written by the banner patch, if it ran and succeeded
    pub patched_version: Option<String>,
    /// Why the banner patch was skipped; the artifact is left as built
    pub patch_error: Option<Error>,
}

impl BuildReport {
    pub fn is_success(&self) -> bool {
        self.outcomes.iter().all(|o| o.result.is_ok())
    }

    pub fn failures(&self) -> impl Iterator<Item = (&BuildTarget, &Error)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().err().map(|e| (&o.target, e)))
    }

    pub fn first_error(&self) -> Option<&Error> {
        self.failures().next().map(|(_, e)| e)
    }

    pub fn artifacts(&self) -> impl Iterator<Item = &BuiltArtifact> {
        self.outcomes.iter().filter_map(|o| o.result.as_ref().ok())
    }

    /// Process exit status: failures only count outside watch mode
    pub fn exit_code(&self, watch: bool) -> i32 {
        if watch || self.is_success() { 0 } else { 1 }
    }
}

/// Runs every build target and the post-build patch
#[derive(Debug, Clone)]
pub struct Orchestrator {
    config: Arc<BuildConfig>,
    backend: Arc<dyn BuildBackend>,
    banner: Option<BannerPatch>,
}

impl Orchestrator {
    /// Orchestrator using the Rolldown backend
    pub fn new(config: BuildConfig) -> Self {
        let backend = Arc::new(RolldownBackend::for_config(&config));
        Self::with_backend(config, backend)
    }

    pub fn with_backend(config: BuildConfig, backend: Arc<dyn BuildBackend>) -> Self {
        Self {
            config: Arc::new(config),
            backend,
            banner: None,
        }
    }

    pub fn with_banner(mut self, banner: BannerPatch) -> Self {
        self.banner = Some(banner);
        self
    }

    /// Drop the banner patch (watch rebuilds only patch once)
    pub fn without_banner(mut self) -> Self {
        self.banner = None;
        self
    }

    pub fn config(&self) -> &BuildConfig {
        &self.config
    }

    pub fn targets(&self) -> Vec<BuildTarget> {
        BuildTarget::all(&self.config)
    }

    /// Build all targets, then patch. Never fails as a whole.
    pub async fn run(&self) -> BuildReport {
        let started = Instant::now();
        let outcomes = self.build_all().await;

        if let Some((target, error)) = outcomes
            .iter()
            .find_map(|o| o.result.as_ref().err().map(|e| (&o.target, e)))
        {
            tracing::error!(target = %target.id(), "{}", error);
        }

        let (patched_version, patch_error) = match &self.banner {
            Some(banner) => match banner.apply().await {
                Ok(version) => (Some(version), None),
                Err(e) => {
                    tracing::warn!(path = %banner.artifact.display(), "banner patch skipped: {}", e);
                    (None, Some(e))
                }
            },
            None => (None, None),
        };

        BuildReport {
            outcomes,
            duration: started.elapsed(),
            patched_version,
            patch_error,
        }
    }

    /// Build all targets concurrently, returning outcomes in target order.
    pub async fn build_all(&self) -> Vec<TargetOutcome> {
        let targets = self.targets();
        let mut join_set = JoinSet::new();
        let mut task_index = HashMap::new();

        for (index, target) in targets.iter().cloned().enumerate() {
            let backend = Arc::clone(&self.backend);
            let config = Arc::clone(&self.config);
            let handle = join_set.spawn(async move {
                tracing::debug!(target = %target.id(), "building");
                let result = backend.build(&target, &config).await;
                (index, result)
            });
            task_index.insert(handle.id(), index);
        }

        let mut results: Vec<Option<Result<BuiltArtifact>>> =
            targets.iter().map(|_| None).collect();

        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok((index, result)) => results[index] = Some(result),
                Err(e) => {
                    if let Some(&index) = task_index.get(&e.id()) {
                        results[index] = Some(Err(Error::TaskAborted {
                            target: targets[index].id(),
                            message: e.to_string(),
                        }));
                    }
                }
            }
        }

        targets
            .into_iter()
            .zip(results)
            .map(|(target, result)| {
                let result = result.unwrap_or_else(|| {
                    Err(Error::TaskAborted {
                        target: target.id(),
                        message: "task produced no result".to_string(),
                    })
                });
                TargetOutcome { target, result }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patch::VersionSource;
    use crate::target::{EntryKind, Variant};
    use async_trait::async_trait;
    use std::fs;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    /// Backend that writes a stub artifact, failing for one target id
    #[derive(Debug, Default)]
    struct StubBackend {
        fail: Option<String>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl BuildBackend for StubBackend {
        async fn build(&self, target: &BuildTarget, _config: &BuildConfig) -> Result<BuiltArtifact> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail.as_deref() == Some(target.id().as_str()) {
                return Err(Error::Bundler {
                    target: target.id(),
                    message: "Could not resolve './missing'".to_string(),
                });
            }

            fs::create_dir_all(target.outfile.parent().unwrap()).unwrap();
            let content = format!("// header\n\"use strict\";\n// {}\n", target.id());
            fs::write(&target.outfile, &content).unwrap();
            Ok(BuiltArtifact {
                path: target.outfile.clone(),
                size: content.len() as u64,
                sourcemap: None,
            })
        }
    }

    #[derive(Debug)]
    struct Fixed;

    #[async_trait]
    impl VersionSource for Fixed {
        async fn latest_version(&self) -> Result<String> {
            Ok("9.9.9".to_string())
        }
    }

    #[derive(Debug)]
    struct Offline;

    #[async_trait]
    impl VersionSource for Offline {
        async fn latest_version(&self) -> Result<String> {
            Err(Error::ReleaseFeed("connection refused".to_string()))
        }
    }

    fn config(temp: &TempDir) -> BuildConfig {
        BuildConfig::new(temp.path()).version("1.0.0").build_timestamp(0)
    }

    fn vesktop_main(temp: &TempDir) -> std::path::PathBuf {
        temp.path().join("dist").join("vencordDesktopMain.js")
    }

    #[tokio::test]
    async fn test_all_targets_succeed() {
        let temp = TempDir::new().unwrap();
        let backend = Arc::new(StubBackend::default());
        let orchestrator = Orchestrator::with_backend(config(&temp), backend.clone());

        let report = orchestrator.run().await;

        assert_eq!(backend.calls.load(Ordering::SeqCst), 6);
        assert!(report.is_success());
        assert_eq!(report.artifacts().count(), 6);
        assert_eq!(report.exit_code(false), 0);
        assert!(report.patched_version.is_none());
    }

    #[tokio::test]
    async fn test_outcomes_keep_target_order() {
        let temp = TempDir::new().unwrap();
        let orchestrator =
            Orchestrator::with_backend(config(&temp), Arc::new(StubBackend::default()));

        let report = orchestrator.run().await;
        let ids: Vec<_> = report.outcomes.iter().map(|o| o.target.id()).collect();
        let expected: Vec<_> = orchestrator.targets().iter().map(|t| t.id()).collect();
        assert_eq!(ids, expected);
    }

    #[tokio::test]
    async fn test_one_failure_fails_the_run() {
        let temp = TempDir::new().unwrap();
        let backend = StubBackend {
            fail: Some("discordDesktop/renderer".to_string()),
            ..Default::default()
        };
        let orchestrator = Orchestrator::with_backend(config(&temp), Arc::new(backend));

        let report = orchestrator.run().await;

        assert!(!report.is_success());
        assert_eq!(report.failures().count(), 1);
        assert_eq!(report.artifacts().count(), 5);
        assert!(matches!(report.first_error(), Some(Error::Bundler { .. })));
        assert_eq!(report.exit_code(false), 1);
        assert_eq!(report.exit_code(true), 0);
    }

    #[tokio::test]
    async fn test_banner_patch_applies() {
        let temp = TempDir::new().unwrap();
        let banner = BannerPatch::new(vesktop_main(&temp), Arc::new(Fixed));
        let orchestrator =
            Orchestrator::with_backend(config(&temp), Arc::new(StubBackend::default()))
                .with_banner(banner);

        let report = orchestrator.run().await;

        assert_eq!(report.patched_version.as_deref(), Some("9.9.9"));
        assert!(report.patch_error.is_none());
        let content = fs::read_to_string(vesktop_main(&temp)).unwrap();
        assert!(content.starts_with("// Vesktop v9.9.9\n\"use strict\";\n"));
    }

    #[tokio::test]
    async fn test_fetch_failure_keeps_artifact_and_exit_code() {
        let temp = TempDir::new().unwrap();
        let banner = BannerPatch::new(vesktop_main(&temp), Arc::new(Offline));
        let orchestrator =
            Orchestrator::with_backend(config(&temp), Arc::new(StubBackend::default()))
                .with_banner(banner);

        let report = orchestrator.run().await;

        assert!(report.patched_version.is_none());
        assert!(matches!(report.patch_error, Some(Error::Fetch(_) | Error::ReleaseFeed(_))));
        assert_eq!(report.exit_code(false), 0);
        let content = fs::read_to_string(vesktop_main(&temp)).unwrap();
        assert_eq!(content, "// header\n\"use strict\";\n// vesktop/main\n");
    }

    #[tokio::test]
    async fn test_patch_runs_even_when_a_build_fails() {
        let temp = TempDir::new().unwrap();
        let backend = StubBackend {
            fail: Some("discordDesktop/preload".to_string()),
            ..Default::default()
        };
        let banner = BannerPatch::new(vesktop_main(&temp), Arc::new(Fixed));
        let orchestrator =
            Orchestrator::with_backend(config(&temp), Arc::new(backend)).with_banner(banner);

        let report = orchestrator.run().await;
        assert_eq!(report.patched_version.as_deref(), Some("9.9.9"));
        assert_eq!(report.exit_code(false), 1);
    }

    #[test]
    fn test_targets_cover_both_variants() {
        let temp = TempDir::new().unwrap();
        let orchestrator =
            Orchestrator::with_backend(config(&temp), Arc::new(StubBackend::default()));
        let targets = orchestrator.targets();

        assert_eq!(targets.len(), 6);
        for variant in Variant::ALL {
            for kind in EntryKind::ALL {
                assert!(targets.iter().any(|t| t.variant == variant && t.kind == kind));
            }
        }
    }
}
