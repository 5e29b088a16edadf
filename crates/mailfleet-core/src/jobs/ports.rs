//! Backend seam for the job poller.
//!
//! The poll controller only needs three resources, so it depends on this
//! trait instead of the concrete HTTP client.

use async_trait::async_trait;

use crate::api::{ApiClient, ApiError, ApiPath};
use crate::jobs::types::{JobDetail, JobSummary, RunJobResponse};

#[async_trait]
pub trait JobsApi: Send + Sync {
    /// `POST /jobs/run`
    async fn run_job(&self, max_parallel_servers: Option<u32>)
    -> Result<RunJobResponse, ApiError>;

    /// `GET /jobs?limit=<n>`
    async fn list_jobs(&self, limit: usize) -> Result<Vec<JobSummary>, ApiError>;

    /// `GET /jobs/<job_id>`
    async fn get_job(&self, job_id: &str) -> Result<JobDetail, ApiError>;
}

pub fn run_job_path(max_parallel_servers: Option<u32>) -> ApiPath {
    let path = ApiPath::new(["jobs", "run"]);
    match max_parallel_servers {
        Some(n) => path.query("max_parallel_servers", n),
        None => path,
    }
}

pub fn list_jobs_path(limit: usize) -> ApiPath {
    ApiPath::new(["jobs"]).query("limit", limit)
}

pub fn job_path(job_id: &str) -> ApiPath {
    ApiPath::new(["jobs", job_id])
}

#[async_trait]
impl JobsApi for ApiClient {
    async fn run_job(
        &self,
        max_parallel_servers: Option<u32>,
    ) -> Result<RunJobResponse, ApiError> {
        self.post::<(), _>(&run_job_path(max_parallel_servers), None)
            .await
    }

    async fn list_jobs(&self, limit: usize) -> Result<Vec<JobSummary>, ApiError> {
        self.get(&list_jobs_path(limit)).await
    }

    async fn get_job(&self, job_id: &str) -> Result<JobDetail, ApiError> {
        self.get(&job_path(job_id)).await
    }
}
