use std::io::{self, Write};

use clap::ArgMatches;
use tracing::{error, info};

use mailfleet_core::api::timestamps::format_timestamp;
use mailfleet_core::events;
use mailfleet_core::fleet::{Account, Domain, FullReport, NewServer, Server, Summary};
use mailfleet_core::fleet_ops;

use super::helpers::{connect, is_confirmation_accepted, or_na, print_json};
use crate::table::TableFormatter;

pub async fn handle_servers_command(
    matches: &ArgMatches,
) -> Result<(), Box<dyn std::error::Error>> {
    let json_output = matches.get_flag("json");
    info!(event = "cli.servers_started", json_output = json_output);

    let (_, client) = connect(matches)?;

    match fleet_ops::list_servers(&client).await {
        Ok(servers) => {
            if json_output {
                print_json(&servers)?;
            } else if servers.is_empty() {
                println!("No servers found.");
            } else {
                print_servers_table(&servers);
            }

            info!(event = "cli.servers_completed", count = servers.len());
            Ok(())
        }
        Err(e) => {
            eprintln!("❌ Failed to load servers: {}", e);
            error!(event = "cli.servers_failed", error = %e);
            events::log_app_error(&e);
            Err(e.into())
        }
    }
}

pub async fn handle_domains_command(
    matches: &ArgMatches,
) -> Result<(), Box<dyn std::error::Error>> {
    let server_id = matches
        .get_one::<String>("server-id")
        .ok_or("Server id argument is required")?;
    let json_output = matches.get_flag("json");

    info!(event = "cli.domains_started", server_id = server_id);

    let (_, client) = connect(matches)?;

    match fleet_ops::domains_for_server(&client, server_id).await {
        Ok(domains) => {
            if json_output {
                print_json(&domains)?;
            } else if domains.is_empty() {
                println!("No domains found for server '{}'.", server_id);
            } else {
                print_domains_table(&domains);
            }

            info!(event = "cli.domains_completed", count = domains.len());
            Ok(())
        }
        Err(e) => {
            eprintln!("❌ Failed to load domains for server '{}': {}", server_id, e);
            error!(event = "cli.domains_failed", server_id = server_id, error = %e);
            events::log_app_error(&e);
            Err(e.into())
        }
    }
}

pub async fn handle_accounts_command(
    matches: &ArgMatches,
) -> Result<(), Box<dyn std::error::Error>> {
    let domain_id = matches
        .get_one::<String>("domain-id")
        .ok_or("Domain id argument is required")?;
    let json_output = matches.get_flag("json");

    info!(event = "cli.accounts_started", domain_id = domain_id);

    let (_, client) = connect(matches)?;

    match fleet_ops::accounts_for_domain(&client, domain_id).await {
        Ok(accounts) => {
            if json_output {
                print_json(&accounts)?;
            } else if accounts.is_empty() {
                println!("No accounts found for domain '{}'.", domain_id);
            } else {
                print_accounts_table(&accounts);
            }

            info!(event = "cli.accounts_completed", count = accounts.len());
            Ok(())
        }
        Err(e) => {
            eprintln!("❌ Failed to load accounts for domain '{}': {}", domain_id, e);
            error!(event = "cli.accounts_failed", domain_id = domain_id, error = %e);
            events::log_app_error(&e);
            Err(e.into())
        }
    }
}

pub async fn handle_summary_command(
    matches: &ArgMatches,
) -> Result<(), Box<dyn std::error::Error>> {
    let json_output = matches.get_flag("json");
    info!(event = "cli.summary_started", json_output = json_output);

    let (_, client) = connect(matches)?;

    match fleet_ops::summary(&client).await {
        Ok(summary) => {
            if json_output {
                print_json(&summary)?;
            } else {
                println!("{}", render_summary(&summary));
            }

            info!(event = "cli.summary_completed");
            Ok(())
        }
        Err(e) => {
            eprintln!("❌ Failed to load summary: {}", e);
            error!(event = "cli.summary_failed", error = %e);
            events::log_app_error(&e);
            Err(e.into())
        }
    }
}

pub async fn handle_report_command(
    matches: &ArgMatches,
) -> Result<(), Box<dyn std::error::Error>> {
    let json_output = matches.get_flag("json");
    info!(event = "cli.report_started", json_output = json_output);

    let (_, client) = connect(matches)?;

    match fleet_ops::report(&client).await {
        Ok(report) => {
            let overview = report.overview();

            if json_output {
                #[derive(serde::Serialize)]
                struct ReportWithOverview<'a> {
                    overview: mailfleet_core::ReportOverview,
                    #[serde(flatten)]
                    report: &'a FullReport,
                }

                print_json(&ReportWithOverview {
                    overview,
                    report: &report,
                })?;
            } else {
                print_report(&report);
            }

            info!(
                event = "cli.report_completed",
                servers = overview.total_servers,
                domains = overview.total_domains
            );
            Ok(())
        }
        Err(e) => {
            eprintln!("❌ Failed to load report: {}", e);
            error!(event = "cli.report_failed", error = %e);
            events::log_app_error(&e);
            Err(e.into())
        }
    }
}

pub async fn handle_add_server_command(
    matches: &ArgMatches,
) -> Result<(), Box<dyn std::error::Error>> {
    let arg = |name: &str| -> Result<String, Box<dyn std::error::Error>> {
        matches
            .get_one::<String>(name)
            .cloned()
            .ok_or_else(|| format!("--{} is required", name).into())
    };

    let server = NewServer {
        name: arg("name")?,
        hostname: arg("hostname")?,
        cli_port: *matches.get_one::<u16>("cli-port").unwrap_or(&7000),
        webadmin_port: *matches.get_one::<u16>("webadmin-port").unwrap_or(&9000),
        username: arg("username")?,
        password: arg("password")?,
    };

    info!(
        event = "cli.add_server_started",
        name = %server.name,
        hostname = %server.hostname
    );

    let (_, client) = connect(matches)?;

    match fleet_ops::add_server(&client, &server).await {
        Ok(response) => {
            println!("✅ {}", response.message);
            info!(event = "cli.add_server_completed", hostname = %server.hostname);
            Ok(())
        }
        Err(e) => {
            eprintln!("❌ Failed to add server '{}': {}", server.hostname, e);
            error!(event = "cli.add_server_failed", hostname = %server.hostname, error = %e);
            events::log_app_error(&e);
            Err(e.into())
        }
    }
}

pub async fn handle_delete_server_command(
    matches: &ArgMatches,
) -> Result<(), Box<dyn std::error::Error>> {
    let hostname = matches
        .get_one::<String>("hostname")
        .ok_or("Hostname argument is required")?;
    let force = matches.get_flag("force");

    info!(event = "cli.delete_server_started", hostname = hostname, force = force);

    let (_, client) = connect(matches)?;

    if !force {
        print!(
            "Delete server '{}' and all its domains and accounts? This cannot be undone. [y/N] ",
            hostname
        );
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;

        if !is_confirmation_accepted(&input) {
            println!("Aborted.");
            info!(event = "cli.delete_server_aborted", hostname = hostname);
            return Ok(());
        }
    }

    match fleet_ops::delete_server(&client, hostname).await {
        Ok(response) => {
            println!("✅ {}", response.message);
            info!(event = "cli.delete_server_completed", hostname = hostname);
            Ok(())
        }
        Err(e) => {
            eprintln!("❌ Failed to delete server '{}': {}", hostname, e);
            error!(event = "cli.delete_server_failed", hostname = hostname, error = %e);
            events::log_app_error(&e);
            Err(e.into())
        }
    }
}

fn print_servers_table(servers: &[Server]) {
    let rows: Vec<Vec<String>> = servers
        .iter()
        .map(|s| {
            vec![
                s.id.clone(),
                s.name.clone(),
                s.hostname.clone(),
                s.cli_port.to_string(),
                s.webadmin_port.to_string(),
                s.username.clone(),
            ]
        })
        .collect();
    let columns = [
        ("ID", 36),
        ("Name", 24),
        ("Hostname", 32),
        ("CLI Port", 8),
        ("WebAdmin", 8),
        ("Username", 16),
    ];
    TableFormatter::new(&columns, &rows).print_table(&rows);
}

fn print_domains_table(domains: &[Domain]) {
    let rows: Vec<Vec<String>> = domains
        .iter()
        .map(|d| {
            vec![
                d.id.clone(),
                d.name.clone(),
                or_na(d.status.as_deref()),
                d.total_accounts.to_string(),
            ]
        })
        .collect();
    let columns = [("ID", 36), ("Domain", 40), ("Status", 12), ("Accounts", 8)];
    TableFormatter::new(&columns, &rows).print_table(&rows);
}

fn print_accounts_table(accounts: &[Account]) {
    let rows: Vec<Vec<String>> = accounts
        .iter()
        .map(|a| {
            vec![
                a.email.clone(),
                or_na(a.assigned_mb),
                or_na(a.used_mb),
                or_na(a.free_mb),
            ]
        })
        .collect();
    let columns = [
        ("Email", 48),
        ("Assigned MB", 12),
        ("Used MB", 12),
        ("Free MB", 12),
    ];
    TableFormatter::new(&columns, &rows).print_table(&rows);
}

fn render_summary(summary: &Summary) -> String {
    format!(
        "Servers:       {}\nDomains:       {}\nAccounts:      {}\nLast snapshot: {}",
        summary.servers_count,
        summary.domains_count,
        summary.accounts_count,
        format_timestamp(summary.last_snapshot_time.as_ref())
    )
}

fn print_report(report: &FullReport) {
    let overview = report.overview();

    println!("Fleet report ({})", format_timestamp(Some(&report.generated_at)));
    println!();
    println!("Servers:  {}", overview.total_servers);
    println!("Domains:  {}", overview.total_domains);
    println!("Accounts: {}", overview.total_accounts);
    println!("Used MB:  {}", overview.total_used_mb);

    if report.servers.is_empty() {
        println!();
        println!("No servers in report.");
        return;
    }

    let rows: Vec<Vec<String>> = report
        .servers
        .iter()
        .map(|server| {
            let accounts: u64 = server.domains.iter().map(|d| d.total_accounts).sum();
            let used_mb: i64 = server
                .domains
                .iter()
                .flat_map(|d| &d.accounts)
                .map(|a| a.used_mb.unwrap_or(0))
                .sum();
            vec![
                server.name.clone(),
                server.hostname.clone(),
                server.domains.len().to_string(),
                accounts.to_string(),
                used_mb.to_string(),
            ]
        })
        .collect();
    let columns = [
        ("Server", 24),
        ("Hostname", 32),
        ("Domains", 8),
        ("Accounts", 8),
        ("Used MB", 10),
    ];

    println!();
    TableFormatter::new(&columns, &rows).print_table(&rows);
}
