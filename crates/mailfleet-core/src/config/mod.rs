//! # Configuration System
//!
//! Hierarchical TOML configuration for mailfleet.
//!
//! ## Configuration Hierarchy
//!
//! Configuration is loaded in the following order (later sources override earlier ones):
//! 1. **Hardcoded defaults** - Built-in fallback values
//! 2. **User config** - `~/.mailfleet/config.toml`
//! 3. **Project config** - `./.mailfleet/config.toml`
//! 4. **Environment** - `MAILFLEET_API_URL`
//! 5. **CLI arguments** - Command-line flags (highest priority)
//!
//! ## Loading Configuration
//!
//! ```rust,no_run
//! use mailfleet_core::config::MailfleetConfig;
//!
//! fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = MailfleetConfig::load_hierarchy()?;
//!     println!("polling every {:?}", config.jobs.poll_interval());
//!     Ok(())
//! }
//! ```

pub mod defaults;
pub mod loading;
pub mod types;
pub mod validation;

pub use types::{ApiConfig, JobsConfig, MailfleetConfig};
pub use validation::{parse_base_url, validate_config};

impl MailfleetConfig {
    /// Load configuration from the hierarchy of config files.
    ///
    /// See [`loading::load_hierarchy`] for details.
    pub fn load_hierarchy() -> Result<Self, crate::errors::ConfigError> {
        loading::load_hierarchy()
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), crate::errors::ConfigError> {
        validation::validate_config(self)
    }
}
