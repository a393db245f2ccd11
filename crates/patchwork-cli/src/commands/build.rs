//! Build command implementation.
//!
//! Loads configuration, runs all six targets through the orchestrator, prints
//! a summary, and either exits with the build status or hands over to watch
//! mode.

use crate::cli::BuildArgs;
use crate::commands::utils;
use crate::config::PatchworkConfig;
use crate::error::{BuildError, Result};
use crate::{ui, watch};
use patchwork_bundler::{BuildReport, Orchestrator};

/// Execute the build command.
///
/// 1. Resolve the project root and load configuration
/// 2. Validate both the CLI and library configuration
/// 3. Build every target and apply the banner patch
/// 4. Print the summary
/// 5. Outside watch mode, fail if any target failed; in watch mode, keep
///    rebuilding until interrupted
pub async fn execute(args: BuildArgs) -> Result<()> {
    let root = utils::resolve_project_root(args.cwd.as_deref())?;
    let config = PatchworkConfig::load(&args, &root)?;
    config.validate()?;

    let build_config = config.to_build_config(&root);
    build_config.validate()?;
    utils::ensure_src_root(&build_config.src_root())?;

    let watch = build_config.watch;
    let banner = if args.no_banner {
        None
    } else {
        config.banner_patch(&build_config)
    };

    ui::info(&format!(
        "Building v{}{}{}",
        build_config.version,
        if build_config.is_dev() { " (dev)" } else { "" },
        if build_config.standalone { " (standalone)" } else { "" },
    ));

    let mut orchestrator = Orchestrator::new(build_config);
    if let Some(banner) = banner {
        orchestrator = orchestrator.with_banner(banner);
    }

    let report = orchestrator.run().await;
    print_report(&report);

    if watch {
        return watch::run(&orchestrator.without_banner(), config.debounce()).await;
    }

    if report.exit_code(watch) != 0 {
        return Err(failure(&report).into());
    }

    Ok(())
}

/// Print per-target failures, the artifact summary, and the overall status.
pub(crate) fn print_report(report: &BuildReport) {
    for (target, error) in report.failures() {
        ui::error(&format!("{}: {}", target.id(), error));
    }

    let entries: Vec<(String, u64)> = report
        .outcomes
        .iter()
        .filter_map(|outcome| {
            let artifact = outcome.result.as_ref().ok()?;
            Some((outcome.target.file_name(), artifact.size))
        })
        .collect();

    if !entries.is_empty() {
        ui::print_build_summary(&entries, report.duration);
    }

    if let Some(version) = &report.patched_version {
        ui::info(&format!("Banner patched to v{}", version));
    }
    if let Some(error) = &report.patch_error {
        ui::warning(&format!("Banner patch skipped: {}", error));
    }

    if report.is_success() {
        ui::success(&format!(
            "Built {} targets in {}",
            report.outcomes.len(),
            ui::format_duration(report.duration)
        ));
    } else {
        ui::error(&format!(
            "{} of {} targets failed",
            report.failures().count(),
            report.outcomes.len()
        ));
    }
}

fn failure(report: &BuildReport) -> BuildError {
    BuildError::TargetsFailed {
        failed: report.failures().count(),
        total: report.outcomes.len(),
        first: report
            .first_error()
            .map(|e| e.to_string())
            .unwrap_or_default(),
    }
}
