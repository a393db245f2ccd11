use crate::cli::BuildArgs;
use crate::config::{CONFIG_FILE_NAME, PatchworkConfig};
use crate::error::{ConfigError, Result};
use figment::{
    Figment,
    providers::{Env, Format as _, Json, Serialized},
};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Environment variables read with the `PATCHWORK_` prefix
const ENV_KEYS: [&str; 5] = ["dev", "watch", "standalone", "minify", "version"];

/// Only the values a source actually sets, so later layers don't reset
/// earlier ones to defaults.
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
struct Overrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    out_dir: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    watch: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    dev: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    standalone: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    disable_updater: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    minify: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    build_timestamp: Option<i64>,
}

impl PatchworkConfig {
    /// Load configuration for the project at `root`.
    ///
    /// Priority: CLI flags > `PATCHWORK_*` env > legacy env > config file > defaults
    pub fn load(args: &BuildArgs, root: &Path) -> Result<Self> {
        let mut figment = Figment::new().merge(Serialized::defaults(Self::default()));

        if let Some(path) = config_file(args.config.as_deref(), root)? {
            tracing::debug!(path = %path.display(), "loading config file");
            figment = figment.merge(Json::file(path));
        }

        figment = figment
            .merge(Serialized::defaults(legacy_env_overrides()))
            .merge(Env::prefixed("PATCHWORK_").only(&ENV_KEYS))
            .merge(Serialized::defaults(Self::cli_overrides(args)));

        figment.extract().map_err(|e| {
            ConfigError::InvalidValue {
                field: "configuration".to_string(),
                value: e.to_string(),
                hint: format!("Check {} syntax and field types", CONFIG_FILE_NAME),
            }
            .into()
        })
    }

    /// Flags are only merged when given; an absent flag never overrides the file.
    fn cli_overrides(args: &BuildArgs) -> Overrides {
        Overrides {
            out_dir: args.out_dir.clone(),
            watch: args.watch.then_some(true),
            dev: args.dev.then_some(true),
            standalone: args.standalone.then_some(true),
            disable_updater: args.disable_updater.then_some(true),
            minify: args.minify_override(),
            build_timestamp: None,
        }
    }
}

/// Resolve which config file to read, if any.
///
/// An explicit `--config` must exist; the default file is optional.
fn config_file(explicit: Option<&Path>, root: &Path) -> Result<Option<PathBuf>> {
    match explicit {
        Some(path) => {
            let path = if path.is_absolute() {
                path.to_path_buf()
            } else {
                root.join(path)
            };
            if !path.is_file() {
                return Err(ConfigError::NotFound(path).into());
            }
            Ok(Some(path))
        }
        None => {
            let default_path = root.join(CONFIG_FILE_NAME);
            Ok(default_path.is_file().then_some(default_path))
        }
    }
}

/// `STANDALONE=true` and `SOURCE_DATE_EPOCH` (seconds) from older build scripts.
fn legacy_env_overrides() -> Overrides {
    let standalone = std::env::var("STANDALONE")
        .ok()
        .filter(|value| value == "true")
        .map(|_| true);

    let build_timestamp = std::env::var("SOURCE_DATE_EPOCH")
        .ok()
        .and_then(|value| parse_source_date_epoch(&value));

    Overrides {
        standalone,
        build_timestamp,
        ..Default::default()
    }
}

/// Seconds since the epoch, as milliseconds.
pub(crate) fn parse_source_date_epoch(value: &str) -> Option<i64> {
    value.trim().parse::<i64>().ok()?.checked_mul(1000)
}
