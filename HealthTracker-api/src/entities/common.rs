use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::error;
use utoipa::ToSchema;

use health_tracker_domain::services::HealthRecordServiceError;

/// Error response format for API
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error type/code - machine-readable identifier
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// Optional additional details about the error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    /// Create a not found error response
    pub fn not_found(message: &str) -> Self {
        Self {
            error: "not_found".to_string(),
            message: message.to_string(),
            details: None,
        }
    }

    /// Create a validation error response
    pub fn validation_error(message: &str, details: Option<serde_json::Value>) -> Self {
        Self {
            error: "validation_error".to_string(),
            message: message.to_string(),
            details,
        }
    }

    /// Create an internal error response
    pub fn internal_error() -> Self {
        Self {
            error: "internal_error".to_string(),
            message: "An unexpected error occurred".to_string(),
            details: None,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self.error.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "validation_error" => StatusCode::UNPROCESSABLE_ENTITY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self)).into_response()
    }
}

impl From<HealthRecordServiceError> for ErrorResponse {
    fn from(err: HealthRecordServiceError) -> Self {
        match err {
            HealthRecordServiceError::NotFound(message) => Self::not_found(&message),
            HealthRecordServiceError::RepositoryError(message) => {
                // Storage details stay in the log
                error!("Storage error: {}", message);
                Self::internal_error()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(ErrorResponse::not_found("No entries found").status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            ErrorResponse::validation_error("bad", None).status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(ErrorResponse::internal_error().status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_repository_error_hides_details() {
        let response: ErrorResponse =
            HealthRecordServiceError::RepositoryError("disk I/O error at /var/lib".to_string()).into();

        assert_eq!(response.error, "internal_error");
        assert!(!response.message.contains("/var/lib"));
        assert!(response.details.is_none());
    }

    #[test]
    fn test_not_found_keeps_message() {
        let response: ErrorResponse = HealthRecordServiceError::NotFound("No entries found".to_string()).into();

        let body = serde_json::to_value(&response).unwrap();
        assert_eq!(body["error"], "not_found");
        assert_eq!(body["message"], "No entries found");
        assert!(body.get("details").is_none());
    }
}
