//! Configuration type definitions for mailfleet.
//!
//! These types are serialized/deserialized from TOML config files.
//!
//! # Example Configuration
//!
//! ```toml
//! [api]
//! base_url = "https://mail-admin.example.com/api"
//! timeout_secs = 15
//!
//! [jobs]
//! poll_interval_ms = 2000
//! history_limit = 10
//! max_parallel_servers = 3
//! ```

use serde::{Deserialize, Serialize};

/// Main configuration loaded from TOML config files.
///
/// Loaded from:
/// 1. User config: `~/.mailfleet/config.toml`
/// 2. Project config: `./.mailfleet/config.toml`
///
/// Project config values override user config values.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct MailfleetConfig {
    /// Backend REST API settings
    #[serde(default)]
    pub api: ApiConfig,

    /// Job polling settings
    #[serde(default)]
    pub jobs: JobsConfig,
}

/// Backend REST API configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ApiConfig {
    /// Base URL every resource path is joined onto.
    /// Default: `http://localhost:8000/api`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Request timeout enforced by the HTTP client.
    /// Default: 30 seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

/// Job polling configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct JobsConfig {
    /// Cadence of job detail re-fetches while a job is running.
    /// Default: 2000ms.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poll_interval_ms: Option<u64>,

    /// Number of recent jobs requested for the history list.
    /// Default: 10.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub history_limit: Option<usize>,

    /// Passed to `POST /jobs/run` when set; the backend picks otherwise.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_parallel_servers: Option<u32>,
}
