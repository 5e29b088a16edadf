use clap::ArgMatches;
use serde::Serialize;
use tracing::{error, warn};

use mailfleet_core::config::defaults::API_URL_ENV;
use mailfleet_core::config::loading::apply_env_overrides;
use mailfleet_core::events;
use mailfleet_core::{ApiClient, MailfleetConfig};

/// Load the config hierarchy, falling back to defaults with a visible warning.
///
/// The environment override still applies on fallback.
pub fn load_config_with_warning() -> MailfleetConfig {
    match MailfleetConfig::load_hierarchy() {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "Warning: Could not load config: {}. Using defaults.\n\
                 Tip: Check ~/.mailfleet/config.toml and ./.mailfleet/config.toml for syntax errors.",
                e
            );
            warn!(
                event = "cli.config.load_failed",
                error = %e,
                "Config load failed, using defaults"
            );
            apply_env_overrides(MailfleetConfig::default(), std::env::var(API_URL_ENV).ok())
        }
    }
}

/// Resolve the effective config (with `--api-url` applied) and build the client.
pub fn connect(
    matches: &ArgMatches,
) -> Result<(MailfleetConfig, ApiClient), Box<dyn std::error::Error>> {
    let mut config = load_config_with_warning();

    let from_flag = matches.get_one::<String>("api-url").is_some();
    if let Some(url) = matches.get_one::<String>("api-url") {
        config.api.base_url = Some(url.clone());
    }

    if let Err(e) = config.validate() {
        eprintln!("❌ Invalid configuration: {}", e);
        error!(event = "cli.config.invalid", error = %e);
        events::log_app_error(&e);
        return Err(e.into());
    }

    let client = ApiClient::from_config(&config.api).inspect_err(|e| {
        eprintln!("❌ Failed to create API client: {}", e);
        error!(event = "cli.client_build_failed", error = %e);
        events::log_app_error(e);
    })?;
    events::log_backend_resolved(client.base_url(), from_flag);

    Ok((config, client))
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn is_confirmation_accepted(input: &str) -> bool {
    let normalized = input.trim().to_lowercase();
    normalized == "y" || normalized == "yes"
}

/// Render an optional value, with `N/A` for missing.
pub fn or_na<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(|| "N/A".to_string(), |v| v.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_confirmation_accepted() {
        assert!(is_confirmation_accepted("y"));
        assert!(is_confirmation_accepted(" YES\n"));
        assert!(!is_confirmation_accepted(""));
        assert!(!is_confirmation_accepted("n"));
        assert!(!is_confirmation_accepted("yep"));
    }

    #[test]
    fn test_or_na() {
        assert_eq!(or_na(Some(12.5)), "12.5");
        assert_eq!(or_na(None::<i64>), "N/A");
    }
}
