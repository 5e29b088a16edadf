//! Scripted in-memory backend for poller tests.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};

use crate::api::ApiError;
use crate::jobs::ports::JobsApi;
use crate::jobs::types::{JobDetail, JobStatus, JobSummary, RunJobResponse};

pub fn detail(job_id: &str, status: JobStatus) -> JobDetail {
    let finished_at = status
        .is_terminal()
        .then(|| Utc.with_ymd_and_hms(2026, 10, 18, 9, 6, 0).unwrap());
    JobDetail {
        job_id: job_id.to_string(),
        name: format!("Poll-{}", job_id),
        status,
        created_at: Utc.with_ymd_and_hms(2026, 10, 18, 9, 5, 0).unwrap(),
        started_at: None,
        finished_at,
        servers: Vec::new(),
    }
}

pub fn summary(job_id: &str, status: JobStatus) -> JobSummary {
    let detail = detail(job_id, status);
    JobSummary {
        job_id: detail.job_id,
        name: detail.name,
        status: detail.status,
        created_at: detail.created_at,
        started_at: detail.started_at,
        finished_at: detail.finished_at,
    }
}

/// Each job id answers from its own queue; the last entry repeats forever.
#[derive(Default)]
pub struct ScriptedApi {
    details: Mutex<HashMap<String, VecDeque<Result<JobDetail, u16>>>>,
    latency: Mutex<HashMap<String, Duration>>,
    detail_calls: Mutex<Vec<String>>,
    list: Mutex<Option<Result<Vec<JobSummary>, u16>>>,
    list_calls: Mutex<Vec<usize>>,
    run: Mutex<Option<Result<RunJobResponse, u16>>>,
    run_calls: Mutex<usize>,
}

impl ScriptedApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn script_job(self, job_id: &str, statuses: &[JobStatus]) -> Self {
        let queue = statuses
            .iter()
            .map(|status| Ok(detail(job_id, status.clone())))
            .collect();
        self.details
            .lock()
            .unwrap()
            .insert(job_id.to_string(), queue);
        self
    }

    /// Queue a failing response (HTTP status) for the next detail fetch of a job.
    pub fn push_job_failure(&self, job_id: &str, status: u16) {
        self.details
            .lock()
            .unwrap()
            .entry(job_id.to_string())
            .or_default()
            .push_front(Err(status));
    }

    /// Make every later detail fetch of `job_id` take `delay` to answer.
    pub fn slow_job(&self, job_id: &str, delay: Duration) {
        self.latency
            .lock()
            .unwrap()
            .insert(job_id.to_string(), delay);
    }

    pub fn with_list(self, jobs: Vec<JobSummary>) -> Self {
        *self.list.lock().unwrap() = Some(Ok(jobs));
        self
    }

    pub fn set_list(&self, jobs: Vec<JobSummary>) {
        *self.list.lock().unwrap() = Some(Ok(jobs));
    }

    pub fn fail_list(&self, status: u16) {
        *self.list.lock().unwrap() = Some(Err(status));
    }

    pub fn with_run_response(self, response: RunJobResponse) -> Self {
        *self.run.lock().unwrap() = Some(Ok(response));
        self
    }

    pub fn fail_run(&self, status: u16) {
        *self.run.lock().unwrap() = Some(Err(status));
    }

    pub fn detail_calls(&self, job_id: &str) -> usize {
        self.detail_calls
            .lock()
            .unwrap()
            .iter()
            .filter(|id| id.as_str() == job_id)
            .count()
    }

    pub fn list_calls(&self) -> Vec<usize> {
        self.list_calls.lock().unwrap().clone()
    }

    pub fn run_calls(&self) -> usize {
        *self.run_calls.lock().unwrap()
    }
}

fn status_error(status: u16) -> ApiError {
    ApiError::Status {
        path: "/jobs".to_string(),
        status,
        message: format!("Request failed: {}", status),
    }
}

#[async_trait]
impl JobsApi for ScriptedApi {
    async fn run_job(
        &self,
        _max_parallel_servers: Option<u32>,
    ) -> Result<RunJobResponse, ApiError> {
        *self.run_calls.lock().unwrap() += 1;
        match self.run.lock().unwrap().clone() {
            Some(Ok(response)) => Ok(response),
            Some(Err(status)) => Err(status_error(status)),
            None => Ok(RunJobResponse::default()),
        }
    }

    async fn list_jobs(&self, limit: usize) -> Result<Vec<JobSummary>, ApiError> {
        self.list_calls.lock().unwrap().push(limit);
        match self.list.lock().unwrap().clone() {
            Some(Ok(jobs)) => Ok(jobs),
            Some(Err(status)) => Err(status_error(status)),
            None => Ok(Vec::new()),
        }
    }

    async fn get_job(&self, job_id: &str) -> Result<JobDetail, ApiError> {
        self.detail_calls.lock().unwrap().push(job_id.to_string());
        let next = {
            let mut details = self.details.lock().unwrap();
            let queue = details.entry(job_id.to_string()).or_default();
            if queue.len() > 1 {
                queue.pop_front()
            } else {
                queue.front().cloned()
            }
        };
        let delay = self.latency.lock().unwrap().get(job_id).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        match next {
            Some(Ok(detail)) => Ok(detail),
            Some(Err(status)) => Err(status_error(status)),
            None => Err(status_error(404)),
        }
    }
}
