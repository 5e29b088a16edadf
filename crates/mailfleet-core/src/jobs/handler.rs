use tracing::{error, info, warn};

use crate::api::{ApiClient, ApiPath};
use crate::jobs::errors::JobError;
use crate::jobs::poller::JobPollController;
use crate::jobs::ports::JobsApi;
use crate::jobs::types::{JobDetail, JobSummary, ServerLogOnly};

/// Start a new job on the backend and begin observing it.
///
/// The error slot is emptied first. A response without a usable `job_id` is
/// a failure: the error slot is set and no job is selected.
pub async fn run_job<A: JobsApi + 'static>(
    controller: &mut JobPollController<A>,
    max_parallel_servers: Option<u32>,
) -> Result<String, JobError> {
    info!(
        event = "core.jobs.run_started",
        max_parallel_servers = max_parallel_servers
    );
    controller.clear_error();

    let response = match controller.api().run_job(max_parallel_servers).await {
        Ok(response) => response,
        Err(e) => {
            error!(event = "core.jobs.run_failed", error = %e);
            controller.record_error(e.to_string());
            return Err(e.into());
        }
    };

    let job_id = match response.job_id.as_deref().map(str::trim) {
        Some(id) if !id.is_empty() => id.to_string(),
        _ => {
            warn!(event = "core.jobs.run_missing_job_id", message = ?response.message);
            controller.record_error(JobError::MissingJobId.to_string());
            return Err(JobError::MissingJobId);
        }
    };

    info!(
        event = "core.jobs.run_completed",
        job_id = job_id,
        servers_count = response.servers_count
    );

    controller.select_job(&job_id).await?;
    Ok(job_id)
}

pub async fn list_jobs(client: &ApiClient, limit: usize) -> Result<Vec<JobSummary>, JobError> {
    info!(event = "core.jobs.list_started", limit = limit);

    let jobs = client.list_jobs(limit).await?;

    info!(event = "core.jobs.list_completed", count = jobs.len());
    Ok(jobs)
}

pub async fn get_job(client: &ApiClient, job_id: &str) -> Result<JobDetail, JobError> {
    let job_id = job_id.trim();
    if job_id.is_empty() {
        return Err(JobError::EmptyJobId);
    }

    info!(event = "core.jobs.get_started", job_id = job_id);

    let job = client.get_job(job_id).await?;

    info!(
        event = "core.jobs.get_completed",
        job_id = job_id,
        status = %job.status,
        servers = job.servers.len()
    );
    Ok(job)
}

/// Fetch the log text of one server within a job.
pub async fn get_server_log(
    client: &ApiClient,
    job_id: &str,
    server_id: &str,
) -> Result<ServerLogOnly, JobError> {
    let job_id = job_id.trim();
    if job_id.is_empty() {
        return Err(JobError::EmptyJobId);
    }

    info!(
        event = "core.jobs.server_log_started",
        job_id = job_id,
        server_id = server_id
    );

    let path = ApiPath::new(["jobs", job_id, "servers", server_id, "log"]);
    let log: ServerLogOnly = client.get(&path).await?;

    info!(
        event = "core.jobs.server_log_completed",
        job_id = job_id,
        server_id = server_id,
        has_log = log.log_text.is_some()
    );
    Ok(log)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_base_url;
    use crate::jobs::session::PollState;
    use crate::jobs::testing::ScriptedApi;
    use crate::jobs::types::{JobStatus, RunJobResponse};
    use std::sync::Arc;
    use std::time::Duration;

    fn controller(api: ScriptedApi) -> (Arc<ScriptedApi>, JobPollController<ScriptedApi>) {
        let api = Arc::new(api);
        let controller = JobPollController::new(Arc::clone(&api), Duration::from_millis(2000), 10);
        (api, controller)
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_job_selects_returned_id() {
        let (api, mut controller) = controller(
            ScriptedApi::new()
                .script_job("j-new", &[JobStatus::Pending])
                .with_run_response(RunJobResponse {
                    job_id: Some("j-new".to_string()),
                    servers_count: Some(3),
                    ..Default::default()
                }),
        );

        let job_id = run_job(&mut controller, Some(2)).await.unwrap();

        assert_eq!(job_id, "j-new");
        assert_eq!(api.run_calls(), 1);
        assert_eq!(api.detail_calls("j-new"), 1);
        let session = controller.session();
        assert_eq!(session.active_job_id(), Some("j-new"));
        assert_eq!(session.state(), PollState::Polling);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_job_without_job_id_aborts() {
        for response in [
            RunJobResponse::default(),
            RunJobResponse {
                job_id: Some("   ".to_string()),
                ..Default::default()
            },
        ] {
            let (api, mut controller) =
                controller(ScriptedApi::new().with_run_response(response));

            let err = run_job(&mut controller, None).await.unwrap_err();

            assert!(matches!(err, JobError::MissingJobId));
            let session = controller.session();
            assert_eq!(session.error(), Some("Backend did not return job_id"));
            assert!(session.active_job_id().is_none());
            assert!(!controller.is_timer_armed());
            assert!(api.list_calls().is_empty());
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_job_clears_previous_error() {
        let (api, mut controller) = controller(
            ScriptedApi::new()
                .script_job("j-new", &[JobStatus::Running])
                .with_run_response(RunJobResponse {
                    job_id: Some("j-new".to_string()),
                    ..Default::default()
                }),
        );
        api.fail_list(500);
        controller.activate().await;
        assert_eq!(controller.session().error(), Some("Request failed: 500"));

        api.set_list(Vec::new());
        run_job(&mut controller, None).await.unwrap();

        assert!(controller.session().error().is_none());
        assert_eq!(controller.session().active_job_id(), Some("j-new"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_job_backend_error_is_recorded() {
        let (api, mut controller) = controller(ScriptedApi::new());
        api.fail_run(500);

        let err = run_job(&mut controller, None).await.unwrap_err();

        assert!(matches!(err, JobError::Api { .. }));
        assert_eq!(controller.session().error(), Some("Request failed: 500"));
        assert!(controller.session().active_job_id().is_none());
    }

    #[tokio::test]
    async fn test_get_server_log() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/jobs/j-1/servers/srv-2/log")
            .with_status(200)
            .with_body(r#"{"job_id":"j-1","server_id":"srv-2","log_text":"Poll-Mail ok"}"#)
            .create_async()
            .await;
        let base = parse_base_url(&format!("{}/api", server.url())).unwrap();
        let client = ApiClient::new(base, Duration::from_secs(5)).unwrap();

        let log = get_server_log(&client, "j-1", "srv-2").await.unwrap();

        assert_eq!(log.log_text.as_deref(), Some("Poll-Mail ok"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_get_job_rejects_blank_id() {
        let base = parse_base_url("http://127.0.0.1:9/api").unwrap();
        let client = ApiClient::new(base, Duration::from_secs(1)).unwrap();

        let err = get_job(&client, " ").await.unwrap_err();
        assert!(matches!(err, JobError::EmptyJobId));
    }
}
