use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize logging with optional quiet mode.
///
/// When `quiet` is true, only error-level events are emitted.
/// When `quiet` is false, info-level and above events are emitted.
/// The `mailfleet` directive matches both the CLI and `mailfleet_core` targets.
pub fn init_logging(quiet: bool) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(std::io::stderr)
                .with_current_span(false)
                .with_span_list(false),
        )
        .with(
            EnvFilter::from_default_env()
                .add_directive(log_directive(quiet).parse().expect("Invalid log directive")),
        )
        .init();
}

fn log_directive(quiet: bool) -> &'static str {
    if quiet {
        "mailfleet=error"
    } else {
        "mailfleet=info"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_directives_parse() {
        for quiet in [true, false] {
            let directive: Result<tracing_subscriber::filter::Directive, _> =
                log_directive(quiet).parse();
            assert!(directive.is_ok(), "directive for quiet={} must parse", quiet);
        }
        assert_eq!(log_directive(true), "mailfleet=error");
        assert_eq!(log_directive(false), "mailfleet=info");
    }
}
