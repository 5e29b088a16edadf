use crate::errors::{ConfigError, MailfleetError};

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Failed to build HTTP client: {source}")]
    BuildClient { source: reqwest::Error },

    #[error("Invalid API configuration: {source}")]
    Config {
        #[from]
        source: ConfigError,
    },

    #[error("Cannot build request URL for '{path}'")]
    InvalidEndpoint { path: String },

    #[error("Request to '{path}' failed: {source}")]
    Transport {
        path: String,
        source: reqwest::Error,
    },

    #[error("{message}")]
    Status {
        path: String,
        status: u16,
        message: String,
    },

    #[error("Unexpected response from '{path}': {message}")]
    Decode { path: String, message: String },
}

impl ApiError {
    /// HTTP status code for non-success responses.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl MailfleetError for ApiError {
    fn error_code(&self) -> &'static str {
        match self {
            ApiError::BuildClient { .. } => "API_BUILD_CLIENT",
            ApiError::Config { .. } => "API_CONFIG",
            ApiError::InvalidEndpoint { .. } => "API_INVALID_ENDPOINT",
            ApiError::Transport { .. } => "API_TRANSPORT",
            ApiError::Status { .. } => "API_STATUS",
            ApiError::Decode { .. } => "API_DECODE",
        }
    }

    fn is_user_error(&self) -> bool {
        matches!(self, ApiError::Config { .. })
    }
}

/// Human-readable message for a non-success response.
///
/// Uses the backend's `detail`/`message` field when the body is a JSON
/// object carrying one, the raw body text otherwise, and falls back to
/// `Request failed: <status>` for empty bodies.
pub fn status_message(status: u16, body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return format!("Request failed: {}", status);
    }

    if let Ok(serde_json::Value::Object(map)) = serde_json::from_str(trimmed) {
        for key in ["detail", "message"] {
            if let Some(serde_json::Value::String(text)) = map.get(key) {
                return text.clone();
            }
        }
    }

    trimmed.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_message_empty_body() {
        assert_eq!(status_message(502, ""), "Request failed: 502");
        assert_eq!(status_message(500, "  \n"), "Request failed: 500");
    }

    #[test]
    fn test_status_message_uses_detail() {
        assert_eq!(
            status_message(404, r#"{"detail":"Job not found"}"#),
            "Job not found"
        );
        assert_eq!(
            status_message(400, r#"{"success":false,"message":"No server found"}"#),
            "No server found"
        );
    }

    #[test]
    fn test_status_message_raw_text() {
        assert_eq!(
            status_message(503, "Service Unavailable"),
            "Service Unavailable"
        );
        // JSON without a usable field keeps the raw text
        assert_eq!(status_message(422, r#"{"detail":[1]}"#), r#"{"detail":[1]}"#);
    }

    #[test]
    fn test_status_error_display_and_code() {
        let error = ApiError::Status {
            path: "/jobs/j-1".to_string(),
            status: 404,
            message: "Job not found".to_string(),
        };
        assert_eq!(error.to_string(), "Job not found");
        assert_eq!(error.status(), Some(404));
        assert_eq!(error.error_code(), "API_STATUS");
        assert!(!error.is_user_error());
    }
}
