use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::api::timestamps;

pub const DEFAULT_CLI_PORT: u16 = 7000;
pub const DEFAULT_WEBADMIN_PORT: u16 = 9000;

/// One monitored mail server. Credentials never leave the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Server {
    pub id: String,
    pub name: String,
    pub hostname: String,
    pub cli_port: u16,
    pub webadmin_port: u16,
    pub username: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Domain {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub status: Option<String>,
    pub total_accounts: u64,
}

/// Mailbox account with quota figures in MB.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub assigned_mb: Option<i64>,
    #[serde(default)]
    pub used_mb: Option<f64>,
    #[serde(default)]
    pub free_mb: Option<f64>,
}

/// Dashboard counters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub servers_count: u64,
    pub domains_count: u64,
    pub accounts_count: u64,
    #[serde(default, deserialize_with = "timestamps::deserialize_option")]
    pub last_snapshot_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FullReport {
    pub servers: Vec<ServerReport>,
    #[serde(deserialize_with = "timestamps::deserialize")]
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerReport {
    pub name: String,
    pub hostname: String,
    pub cli_port: u16,
    pub webadmin_port: u16,
    pub username: String,
    #[serde(default)]
    pub domains: Vec<DomainReport>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainReport {
    pub name: String,
    #[serde(default)]
    pub status: Option<String>,
    pub total_accounts: u64,
    #[serde(default)]
    pub accounts: Vec<AccountReport>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountReport {
    pub email: String,
    pub local_part: String,
    #[serde(default)]
    pub assigned_mb: Option<i64>,
    #[serde(default)]
    pub used_mb: Option<i64>,
    #[serde(default)]
    pub free_mb: Option<i64>,
    #[serde(default)]
    pub status: Option<String>,
}

/// Fleet-wide totals derived from a [`FullReport`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReportOverview {
    pub total_servers: usize,
    pub total_domains: usize,
    pub total_accounts: u64,
    pub total_used_mb: i64,
}

impl FullReport {
    /// Account totals come from `total_accounts`; used MB sums the listed
    /// accounts, with a missing `used_mb` counted as zero.
    pub fn overview(&self) -> ReportOverview {
        let domains = self.servers.iter().flat_map(|server| &server.domains);

        domains.fold(
            ReportOverview {
                total_servers: self.servers.len(),
                ..Default::default()
            },
            |mut overview, domain| {
                overview.total_domains += 1;
                overview.total_accounts += domain.total_accounts;
                overview.total_used_mb += domain
                    .accounts
                    .iter()
                    .map(|account| account.used_mb.unwrap_or(0))
                    .sum::<i64>();
                overview
            },
        )
    }
}

/// Body of `POST /add_server/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewServer {
    pub name: String,
    pub hostname: String,
    #[serde(default = "default_cli_port")]
    pub cli_port: u16,
    #[serde(default = "default_webadmin_port")]
    pub webadmin_port: u16,
    pub username: String,
    pub password: String,
}

fn default_cli_port() -> u16 {
    DEFAULT_CLI_PORT
}

fn default_webadmin_port() -> u16 {
    DEFAULT_WEBADMIN_PORT
}

/// Body of `DELETE /delete_server/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteServerRequest {
    pub hostname: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseMessage {
    pub success: bool,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn account(used_mb: Option<i64>) -> AccountReport {
        AccountReport {
            email: "ops@poll.example".to_string(),
            local_part: "ops".to_string(),
            assigned_mb: Some(1024),
            used_mb,
            free_mb: None,
            status: None,
        }
    }

    fn domain(total_accounts: u64, accounts: Vec<AccountReport>) -> DomainReport {
        DomainReport {
            name: "poll.example".to_string(),
            status: Some("enabled".to_string()),
            total_accounts,
            accounts,
        }
    }

    fn server(domains: Vec<DomainReport>) -> ServerReport {
        ServerReport {
            name: "mx-1".to_string(),
            hostname: "10.0.0.1".to_string(),
            cli_port: DEFAULT_CLI_PORT,
            webadmin_port: DEFAULT_WEBADMIN_PORT,
            username: "admin".to_string(),
            domains,
        }
    }

    #[test]
    fn test_overview_sums_with_missing_usage_as_zero() {
        let report = FullReport {
            servers: vec![
                server(vec![
                    domain(2, vec![account(Some(100)), account(None)]),
                    domain(1, vec![account(Some(50))]),
                ]),
                server(vec![domain(0, Vec::new())]),
            ],
            generated_at: Utc::now(),
        };

        let overview = report.overview();

        assert_eq!(
            overview,
            ReportOverview {
                total_servers: 2,
                total_domains: 3,
                total_accounts: 3,
                total_used_mb: 150,
            }
        );
    }

    #[test]
    fn test_overview_of_empty_report() {
        let report = FullReport {
            servers: Vec::new(),
            generated_at: Utc::now(),
        };
        assert_eq!(report.overview(), ReportOverview::default());
    }

    #[test]
    fn test_new_server_port_defaults() {
        let parsed: NewServer = serde_json::from_value(json!({
            "name": "mx-2",
            "hostname": "10.0.0.2",
            "username": "admin",
            "password": "secret"
        }))
        .unwrap();
        assert_eq!(parsed.cli_port, 7000);
        assert_eq!(parsed.webadmin_port, 9000);
    }

    #[test]
    fn test_summary_without_snapshot() {
        let summary: Summary = serde_json::from_value(json!({
            "servers_count": 2,
            "domains_count": 5,
            "accounts_count": 40,
            "last_snapshot_time": null
        }))
        .unwrap();
        assert!(summary.last_snapshot_time.is_none());
        assert_eq!(summary.accounts_count, 40);
    }

    #[test]
    fn test_account_accepts_fractional_usage() {
        let parsed: Account = serde_json::from_value(json!({
            "id": "3f1c",
            "email": "ops@poll.example",
            "assigned_mb": 2048,
            "used_mb": 12.5,
            "free_mb": null
        }))
        .unwrap();
        assert_eq!(parsed.used_mb, Some(12.5));
        assert!(parsed.free_mb.is_none());
    }
}
