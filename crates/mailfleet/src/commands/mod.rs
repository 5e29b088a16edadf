use clap::ArgMatches;
use tracing::error;

use mailfleet_core::events;

mod fleet;
mod helpers;
mod jobs;

pub async fn run_command(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    events::log_app_startup();

    let result = match matches.subcommand() {
        Some(("servers", sub_matches)) => fleet::handle_servers_command(sub_matches).await,
        Some(("domains", sub_matches)) => fleet::handle_domains_command(sub_matches).await,
        Some(("accounts", sub_matches)) => fleet::handle_accounts_command(sub_matches).await,
        Some(("summary", sub_matches)) => fleet::handle_summary_command(sub_matches).await,
        Some(("report", sub_matches)) => fleet::handle_report_command(sub_matches).await,
        Some(("add-server", sub_matches)) => fleet::handle_add_server_command(sub_matches).await,
        Some(("delete-server", sub_matches)) => {
            fleet::handle_delete_server_command(sub_matches).await
        }
        Some(("jobs", sub_matches)) => jobs::run_jobs_command(sub_matches).await,
        _ => {
            error!(event = "cli.command_unknown");
            Err("Unknown command".into())
        }
    };

    events::log_app_shutdown();
    result
}
