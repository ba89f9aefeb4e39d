//! Error bodies for the workload engine API.
//!
//! Every failed request answers with an [`ApiError`] carrying a stable code,
//! a message, and the correlation id the request was logged under.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::EngineError;

/// Error body returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Stable code, e.g. `UNSUPPORTED_ADJUSTMENT_MODE`.
    pub code: String,
    /// Human-readable summary.
    pub message: String,
    /// The underlying cause, when there is one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    /// Correlation id of the failed request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<Uuid>,
}

impl ApiError {
    fn new(code: &str, message: impl Into<String>, details: Option<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.into(),
            details,
            correlation_id: None,
        }
    }

    /// The body could not be parsed as a workload request.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message, None)
    }

    /// The body parsed but a required field is missing.
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message, None)
    }

    /// The request was not sent as JSON.
    pub fn missing_content_type() -> Self {
        Self::new(
            "MISSING_CONTENT_TYPE",
            "Content-Type must be application/json",
            None,
        )
    }

    /// Tags the body with the request's correlation id.
    pub fn for_request(mut self, correlation_id: Uuid) -> Self {
        self.correlation_id = Some(correlation_id);
        self
    }
}

/// An [`ApiError`] paired with its HTTP status.
#[derive(Debug)]
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl ApiErrorResponse {
    /// A 400 response for a request the client must fix.
    pub fn bad_request(error: ApiError) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error,
        }
    }

    /// Tags the body with the request's correlation id.
    pub fn for_request(mut self, correlation_id: Uuid) -> Self {
        self.error = self.error.for_request(correlation_id);
        self
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        let (status, code, message) = match &error {
            EngineError::UnsupportedAdjustmentMode { mode } => (
                StatusCode::BAD_REQUEST,
                "UNSUPPORTED_ADJUSTMENT_MODE",
                format!(
                    "Unsupported co-convened adjustment mode '{mode}'; use 'collapse' or 'split'"
                ),
            ),
            EngineError::InvalidLoadTransition { course, .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "CALCULATION_ERROR",
                format!("Workload run aborted at course '{course}'"),
            ),
            EngineError::CalculationError { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "CALCULATION_ERROR",
                "Workload run aborted".to_string(),
            ),
            EngineError::ConfigNotFound { .. } | EngineError::ConfigParseError { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "CONFIG_ERROR",
                "Workload configuration unavailable".to_string(),
            ),
        };

        Self {
            status,
            error: ApiError::new(code, message, Some(error.to_string())),
        }
    }
}
