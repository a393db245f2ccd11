use crate::config::PatchworkConfig;
use crate::error::{ConfigError, Result};

impl PatchworkConfig {
    /// Validate configuration for logical consistency.
    ///
    /// Project-level checks (root exists, version non-empty) happen on the
    /// library `BuildConfig`.
    pub fn validate(&self) -> Result<()> {
        if self.out_dir.as_os_str().is_empty() {
            return Err(ConfigError::MissingField {
                field: "outDir".to_string(),
                hint: "Set an output directory such as \"dist\"".to_string(),
            }
            .into());
        }

        if self.sourcemap_scheme.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "sourcemapScheme".to_string(),
                value: "\"\"".to_string(),
                hint: "Use a scheme prefix such as \"vencord://\"".to_string(),
            }
            .into());
        }

        if self.debounce_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "debounceMs".to_string(),
                value: "0".to_string(),
                hint: "Debounce must be at least 1 millisecond".to_string(),
            }
            .into());
        }

        if let Some(version) = &self.version {
            if version.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: "version".to_string(),
                    value: format!("{:?}", version),
                    hint: "Remove the override to use package.json".to_string(),
                }
                .into());
            }
        }

        if self.banner.enabled {
            self.validate_banner()?;
        }

        Ok(())
    }

    fn validate_banner(&self) -> Result<()> {
        let banner = &self.banner;

        if banner.releases_url.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "banner.releasesUrl".to_string(),
                value: "\"\"".to_string(),
                hint: "Set a releases feed URL or disable the banner".to_string(),
            }
            .into());
        }

        if !banner.releases_url.starts_with("https://") && !banner.releases_url.starts_with("http://")
        {
            return Err(ConfigError::InvalidValue {
                field: "banner.releasesUrl".to_string(),
                value: banner.releases_url.clone(),
                hint: "Must be an http:// or https:// URL".to_string(),
            }
            .into());
        }

        if banner.marker.is_empty() {
            return Err(ConfigError::MissingField {
                field: "banner.marker".to_string(),
                hint: "The banner is inserted before the line containing the marker".to_string(),
            }
            .into());
        }

        if banner.artifact.as_os_str().is_empty() || banner.artifact.is_absolute() {
            return Err(ConfigError::InvalidValue {
                field: "banner.artifact".to_string(),
                value: banner.artifact.display().to_string(),
                hint: "Use a file name relative to the output directory".to_string(),
            }
            .into());
        }

        if banner.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "banner.timeoutSecs".to_string(),
                value: "0".to_string(),
                hint: "Timeout must be at least 1 second".to_string(),
            }
            .into());
        }

        Ok(())
    }
}
