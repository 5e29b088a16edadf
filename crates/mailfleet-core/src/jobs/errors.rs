use crate::api::ApiError;
use crate::errors::MailfleetError;

#[derive(Debug, thiserror::Error)]
pub enum JobError {
    #[error("Job id cannot be empty")]
    EmptyJobId,

    #[error("Backend did not return job_id")]
    MissingJobId,

    #[error(transparent)]
    Api {
        #[from]
        source: ApiError,
    },
}

impl MailfleetError for JobError {
    fn error_code(&self) -> &'static str {
        match self {
            JobError::EmptyJobId => "JOB_EMPTY_ID",
            JobError::MissingJobId => "JOB_MISSING_ID",
            JobError::Api { source } => source.error_code(),
        }
    }

    fn is_user_error(&self) -> bool {
        matches!(self, JobError::EmptyJobId)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_job_id_message() {
        let error = JobError::MissingJobId;
        assert_eq!(error.to_string(), "Backend did not return job_id");
        assert_eq!(error.error_code(), "JOB_MISSING_ID");
        assert!(!error.is_user_error());
    }

    #[test]
    fn test_api_error_is_transparent() {
        let error = JobError::from(ApiError::Status {
            path: "/jobs/run".to_string(),
            status: 500,
            message: "Request failed: 500".to_string(),
        });
        assert_eq!(error.to_string(), "Request failed: 500");
        assert_eq!(error.error_code(), "API_STATUS");
    }
}
