use tracing::{error, info};
use url::Url;

pub fn log_app_startup() {
    info!(
        event = "core.app.startup_completed",
        version = env!("CARGO_PKG_VERSION")
    );
}

/// Which backend this invocation talks to, and whether `--api-url` chose it.
pub fn log_backend_resolved(base_url: &Url, from_flag: bool) {
    info!(
        event = "core.app.backend_resolved",
        base_url = %base_url,
        host = base_url.host_str(),
        from_flag = from_flag
    );
}

pub fn log_app_shutdown() {
    info!(event = "core.app.shutdown_started");
}

pub fn log_app_error(error: &dyn std::error::Error) {
    error!(
        event = "core.app.error_occurred",
        error = %error,
        error_type = std::any::type_name_of_val(error)
    );
}
