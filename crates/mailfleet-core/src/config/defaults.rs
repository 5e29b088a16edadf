//! Default values and accessors for configuration types.
//!
//! Every optional field resolves to its default through an accessor so that
//! merging can tell "unset" apart from "explicitly set to the default".

use crate::config::types::{ApiConfig, JobsConfig};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 2000;
pub const DEFAULT_HISTORY_LIMIT: usize = 10;

/// Environment variable that overrides `api.base_url` from config files.
pub const API_URL_ENV: &str = "MAILFLEET_API_URL";

impl ApiConfig {
    pub fn base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    pub fn timeout_secs(&self) -> u64 {
        self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs())
    }
}

impl JobsConfig {
    pub fn poll_interval_ms(&self) -> u64 {
        self.poll_interval_ms.unwrap_or(DEFAULT_POLL_INTERVAL_MS)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms())
    }

    pub fn history_limit(&self) -> usize {
        self.history_limit.unwrap_or(DEFAULT_HISTORY_LIMIT)
    }
}

/// Directory holding the user config file (`~/.mailfleet`).
///
/// Returns `None` when no home directory can be determined.
pub fn user_config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".mailfleet"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_defaults() {
        let api = ApiConfig::default();
        assert_eq!(api.base_url(), "http://localhost:8000/api");
        assert_eq!(api.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_jobs_defaults() {
        let jobs = JobsConfig::default();
        assert_eq!(jobs.poll_interval(), Duration::from_millis(2000));
        assert_eq!(jobs.history_limit(), 10);
        assert_eq!(jobs.max_parallel_servers, None);
    }

    #[test]
    fn test_explicit_values_win() {
        let jobs = JobsConfig {
            poll_interval_ms: Some(250),
            history_limit: Some(3),
            max_parallel_servers: Some(2),
        };
        assert_eq!(jobs.poll_interval_ms(), 250);
        assert_eq!(jobs.history_limit(), 3);
    }
}
