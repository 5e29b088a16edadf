use crate::config::types::MailfleetConfig;
use crate::errors::ConfigError;
use url::Url;

/// Validate a fully merged configuration.
pub fn validate_config(config: &MailfleetConfig) -> Result<(), ConfigError> {
    parse_base_url(config.api.base_url())?;

    if config.api.timeout_secs() == 0 {
        return Err(ConfigError::InvalidConfiguration {
            message: "api.timeout_secs must be greater than 0".to_string(),
        });
    }

    if config.jobs.poll_interval_ms() == 0 {
        return Err(ConfigError::InvalidConfiguration {
            message: "jobs.poll_interval_ms must be greater than 0".to_string(),
        });
    }

    if config.jobs.history_limit() == 0 {
        return Err(ConfigError::InvalidConfiguration {
            message: "jobs.history_limit must be greater than 0".to_string(),
        });
    }

    if config.jobs.max_parallel_servers == Some(0) {
        return Err(ConfigError::InvalidConfiguration {
            message: "jobs.max_parallel_servers must be greater than 0 when set".to_string(),
        });
    }

    Ok(())
}

/// Parse the API base URL, accepting only http(s).
///
/// A trailing slash is added so relative resource paths join under the base
/// path instead of replacing its last segment.
pub fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let with_slash = if raw.ends_with('/') {
        raw.to_string()
    } else {
        format!("{}/", raw)
    };

    let url = Url::parse(&with_slash).map_err(|e| ConfigError::InvalidBaseUrl {
        url: raw.to_string(),
        message: e.to_string(),
    })?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ConfigError::InvalidBaseUrl {
            url: raw.to_string(),
            message: format!("unsupported scheme '{}'", other),
        }),
    }
}
