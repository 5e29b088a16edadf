//! Fleet inventory views: servers, domains, accounts, summary and report.

pub mod errors;
pub mod handler;
pub mod types;

pub use errors::FleetError;
pub use handler::{
    accounts_for_domain, add_server, delete_server, domains_for_server, list_servers, report,
    summary,
};
pub use types::{
    Account, DeleteServerRequest, Domain, FullReport, NewServer, ReportOverview, ResponseMessage,
    Server, Summary,
};
