use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::api::timestamps;

/// Status of a job or of one server's sub-result.
///
/// `Success` and `Finished` are both terminal-success values. The backend
/// owns the state machine, so unknown values are preserved as `Other` and
/// treated as non-terminal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum JobStatus {
    Pending,
    Running,
    Success,
    Failed,
    Finished,
    Other(String),
}

impl JobStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            JobStatus::Success | JobStatus::Failed | JobStatus::Finished
        )
    }

    pub fn as_str(&self) -> &str {
        match self {
            JobStatus::Pending => "PENDING",
            JobStatus::Running => "RUNNING",
            JobStatus::Success => "SUCCESS",
            JobStatus::Failed => "FAILED",
            JobStatus::Finished => "FINISHED",
            JobStatus::Other(raw) => raw,
        }
    }
}

impl From<String> for JobStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "PENDING" => JobStatus::Pending,
            "RUNNING" => JobStatus::Running,
            "SUCCESS" => JobStatus::Success,
            "FAILED" => JobStatus::Failed,
            "FINISHED" => JobStatus::Finished,
            _ => JobStatus::Other(raw),
        }
    }
}

impl From<JobStatus> for String {
    fn from(status: JobStatus) -> Self {
        match status {
            JobStatus::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl FromStr for JobStatus {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(JobStatus::from(s.to_string()))
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of `GET /jobs`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobSummary {
    pub job_id: String,
    pub name: String,
    pub status: JobStatus,
    #[serde(deserialize_with = "timestamps::deserialize")]
    pub created_at: DateTime<Utc>,
    #[serde(default, deserialize_with = "timestamps::deserialize_option")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "timestamps::deserialize_option")]
    pub finished_at: Option<DateTime<Utc>>,
}

/// `GET /jobs/<job_id>`: the job plus every server's sub-result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobDetail {
    pub job_id: String,
    pub name: String,
    pub status: JobStatus,
    #[serde(deserialize_with = "timestamps::deserialize")]
    pub created_at: DateTime<Utc>,
    #[serde(default, deserialize_with = "timestamps::deserialize_option")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "timestamps::deserialize_option")]
    pub finished_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub servers: Vec<ServerLog>,
}

impl JobDetail {
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}

/// One server's contribution to a job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerLog {
    pub server_id: String,
    pub server_name: String,
    pub status: JobStatus,
    #[serde(default, deserialize_with = "timestamps::deserialize_option")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "timestamps::deserialize_option")]
    pub finished_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub log_text: Option<String>,
}

/// `GET /jobs/<job_id>/servers/<server_id>/log`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerLogOnly {
    pub job_id: String,
    pub server_id: String,
    #[serde(default)]
    pub log_text: Option<String>,
}

/// `POST /jobs/run` response. `job_id` is optional on the wire so that its
/// absence can be reported instead of failing as a decode error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunJobResponse {
    #[serde(default)]
    pub job_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub servers_count: Option<u32>,
    #[serde(default)]
    pub message: Option<String>,
}
