//! Jobs: starting runs, listing history and observing one job until it ends.

pub mod errors;
pub mod handler;
pub mod poller;
pub mod ports;
pub mod session;
pub mod types;

#[cfg(test)]
mod testing;

pub use errors::JobError;
pub use handler::{get_job, get_server_log, list_jobs, run_job};
pub use poller::JobPollController;
pub use ports::JobsApi;
pub use session::{PollSession, PollState};
pub use types::{JobDetail, JobStatus, JobSummary, RunJobResponse, ServerLog, ServerLogOnly};
