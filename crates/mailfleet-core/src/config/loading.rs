//! Configuration loading and merging logic.
//!
//! # Configuration Hierarchy
//!
//! Configuration is loaded in the following order (later sources override earlier ones):
//! 1. **Hardcoded defaults** - Built-in fallback values
//! 2. **User config** - `~/.mailfleet/config.toml`
//! 3. **Project config** - `./.mailfleet/config.toml`
//! 4. **Environment** - `MAILFLEET_API_URL`
//! 5. **CLI arguments** - Command-line flags (applied by the CLI, highest priority)

use crate::config::defaults::{API_URL_ENV, user_config_dir};
use crate::config::types::{ApiConfig, JobsConfig, MailfleetConfig};
use crate::config::validation::validate_config;
use crate::errors::ConfigError;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Load configuration from the hierarchy of config files.
///
/// # Errors
///
/// Returns an error if a present file cannot be parsed or the merged
/// configuration fails validation. Missing config files are not errors.
pub fn load_hierarchy() -> Result<MailfleetConfig, ConfigError> {
    let mut config = MailfleetConfig::default();

    if let Some(dir) = user_config_dir()
        && let Some(user_config) = load_config_file(&dir.join("config.toml"))?
    {
        config = merge_configs(config, user_config);
    }

    let project_path = std::env::current_dir()?
        .join(".mailfleet")
        .join("config.toml");
    if let Some(project_config) = load_config_file(&project_path)? {
        config = merge_configs(config, project_config);
    }

    config = apply_env_overrides(config, std::env::var(API_URL_ENV).ok());

    validate_config(&config)?;

    Ok(config)
}

/// Load a configuration file, returning `Ok(None)` when it does not exist.
pub fn load_config_file(path: &Path) -> Result<Option<MailfleetConfig>, ConfigError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(event = "core.config.file_missing", path = %path.display());
            return Ok(None);
        }
        Err(e) => return Err(e.into()),
    };

    let config = toml::from_str(&content).map_err(|e| ConfigError::ConfigParseError {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;

    debug!(event = "core.config.file_loaded", path = %path.display());
    Ok(Some(config))
}

/// Merge two configurations, with override_config taking precedence.
///
/// Every field is optional, so an override only replaces values it sets.
pub fn merge_configs(base: MailfleetConfig, override_config: MailfleetConfig) -> MailfleetConfig {
    MailfleetConfig {
        api: ApiConfig {
            base_url: override_config.api.base_url.or(base.api.base_url),
            timeout_secs: override_config.api.timeout_secs.or(base.api.timeout_secs),
        },
        jobs: JobsConfig {
            poll_interval_ms: override_config
                .jobs
                .poll_interval_ms
                .or(base.jobs.poll_interval_ms),
            history_limit: override_config
                .jobs
                .history_limit
                .or(base.jobs.history_limit),
            max_parallel_servers: override_config
                .jobs
                .max_parallel_servers
                .or(base.jobs.max_parallel_servers),
        },
    }
}

/// Apply the `MAILFLEET_API_URL` override. Blank values are ignored.
pub fn apply_env_overrides(
    mut config: MailfleetConfig,
    api_url: Option<String>,
) -> MailfleetConfig {
    if let Some(url) = api_url.filter(|u| !u.trim().is_empty()) {
        config.api.base_url = Some(url.trim().to_string());
    }
    config
}
