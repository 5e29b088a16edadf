use tracing::{error, info, warn};

use crate::api::{ApiClient, ApiPath};
use crate::fleet::errors::FleetError;
use crate::fleet::types::{
    Account, DeleteServerRequest, Domain, FullReport, NewServer, ResponseMessage, Server, Summary,
};

fn collection(segments: &[&str]) -> ApiPath {
    ApiPath::new(segments.iter().copied()).with_trailing_slash()
}

pub async fn list_servers(client: &ApiClient) -> Result<Vec<Server>, FleetError> {
    info!(event = "core.fleet.list_servers_started");

    let servers: Vec<Server> = client.get(&collection(&["servers"])).await?;

    info!(event = "core.fleet.list_servers_completed", count = servers.len());
    Ok(servers)
}

pub async fn domains_for_server(
    client: &ApiClient,
    server_id: &str,
) -> Result<Vec<Domain>, FleetError> {
    let server_id = required("server_id", server_id)?;
    info!(event = "core.fleet.list_domains_started", server_id = server_id);

    let domains: Vec<Domain> = client
        .get(&collection(&["domains", "server", server_id]))
        .await?;

    info!(
        event = "core.fleet.list_domains_completed",
        server_id = server_id,
        count = domains.len()
    );
    Ok(domains)
}

pub async fn accounts_for_domain(
    client: &ApiClient,
    domain_id: &str,
) -> Result<Vec<Account>, FleetError> {
    let domain_id = required("domain_id", domain_id)?;
    info!(event = "core.fleet.list_accounts_started", domain_id = domain_id);

    let accounts: Vec<Account> = client
        .get(&collection(&["accounts", "domain", domain_id]))
        .await?;

    info!(
        event = "core.fleet.list_accounts_completed",
        domain_id = domain_id,
        count = accounts.len()
    );
    Ok(accounts)
}

pub async fn summary(client: &ApiClient) -> Result<Summary, FleetError> {
    info!(event = "core.fleet.summary_started");
    let summary = client.get(&collection(&["summary"])).await?;
    info!(event = "core.fleet.summary_completed");
    Ok(summary)
}

pub async fn report(client: &ApiClient) -> Result<FullReport, FleetError> {
    info!(event = "core.fleet.report_started");

    let report: FullReport = client.get(&collection(&["report"])).await?;

    info!(
        event = "core.fleet.report_completed",
        servers = report.servers.len()
    );
    Ok(report)
}

/// Register a new server. The backend refuses duplicate hostnames.
pub async fn add_server(
    client: &ApiClient,
    server: &NewServer,
) -> Result<ResponseMessage, FleetError> {
    for (field, value) in [
        ("name", &server.name),
        ("hostname", &server.hostname),
        ("username", &server.username),
        ("password", &server.password),
    ] {
        required(field, value)?;
    }

    info!(
        event = "core.fleet.add_server_started",
        name = %server.name,
        hostname = %server.hostname
    );

    let response: ResponseMessage = client
        .post(&collection(&["add_server"]), Some(server))
        .await
        .inspect_err(|e| error!(event = "core.fleet.add_server_failed", error = %e))?;

    accepted("add_server", response)
}

/// Remove a server by hostname. A `success: false` answer is an error.
pub async fn delete_server(
    client: &ApiClient,
    hostname: &str,
) -> Result<ResponseMessage, FleetError> {
    let hostname = required("hostname", hostname)?;
    info!(event = "core.fleet.delete_server_started", hostname = hostname);

    let request = DeleteServerRequest {
        hostname: hostname.to_string(),
    };
    let response: ResponseMessage = client
        .delete(&collection(&["delete_server"]), &request)
        .await
        .inspect_err(|e| error!(event = "core.fleet.delete_server_failed", error = %e))?;

    accepted("delete_server", response)
}

fn required<'a>(field: &'static str, value: &'a str) -> Result<&'a str, FleetError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(FleetError::InvalidInput { field });
    }
    Ok(value)
}

fn accepted(action: &str, response: ResponseMessage) -> Result<ResponseMessage, FleetError> {
    if !response.success {
        warn!(
            event = "core.fleet.request_rejected",
            action = action,
            message = %response.message
        );
        return Err(FleetError::Rejected {
            message: response.message,
        });
    }

    info!(event = "core.fleet.request_accepted", action = action);
    Ok(response)
}
