//! mailfleet-core: Core library for the mailfleet monitoring client
//!
//! This library talks to the mail-fleet backend REST API and keeps the
//! client-side state of the job views. It is used by the `mailfleet` CLI.
//!
//! # Main Entry Points
//!
//! - [`jobs`] - Run jobs, list history, poll one job until it ends
//! - [`fleet`] - Servers, domains, accounts, summary and report
//! - [`api`] - JSON client for the backend
//! - [`config`] - Configuration management

pub mod api;
pub mod config;
pub mod errors;
pub mod events;
pub mod fleet;
pub mod jobs;
pub mod logging;

// Re-export commonly used types at crate root for convenience
pub use api::{ApiClient, ApiError};
pub use config::MailfleetConfig;
pub use errors::{ConfigError, MailfleetError, MailfleetResult};
pub use fleet::{FleetError, FullReport, NewServer, ReportOverview};
pub use jobs::{
    JobDetail, JobError, JobPollController, JobStatus, JobSummary, PollSession, PollState,
};

// Re-export handler modules as the primary API
pub use fleet::handler as fleet_ops;
pub use jobs::handler as job_ops;

// Re-export logging initialization
pub use logging::init_logging;
