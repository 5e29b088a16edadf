use crate::api::ApiError;
use crate::errors::MailfleetError;

#[derive(Debug, thiserror::Error)]
pub enum FleetError {
    #[error("Missing required field: {field}")]
    InvalidInput { field: &'static str },

    #[error("{message}")]
    Rejected { message: String },

    #[error(transparent)]
    Api {
        #[from]
        source: ApiError,
    },
}

impl MailfleetError for FleetError {
    fn error_code(&self) -> &'static str {
        match self {
            FleetError::InvalidInput { .. } => "FLEET_INVALID_INPUT",
            FleetError::Rejected { .. } => "FLEET_REJECTED",
            FleetError::Api { source } => source.error_code(),
        }
    }

    fn is_user_error(&self) -> bool {
        match self {
            FleetError::InvalidInput { .. } | FleetError::Rejected { .. } => true,
            FleetError::Api { source } => source.is_user_error(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejected_shows_backend_message() {
        let error = FleetError::Rejected {
            message: "No server found with hostname: 10.0.0.9".to_string(),
        };
        assert_eq!(error.to_string(), "No server found with hostname: 10.0.0.9");
        assert_eq!(error.error_code(), "FLEET_REJECTED");
        assert!(error.is_user_error());
    }

    #[test]
    fn test_invalid_input() {
        let error = FleetError::InvalidInput { field: "hostname" };
        assert_eq!(error.to_string(), "Missing required field: hostname");
    }
}
