//! HTTP error mapping with a structured JSON body.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use handoff_core::AssistantError;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: &'static str,
    pub message: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Invalid request: {0}")]
    BadRequest(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            ApiError::NotFound(detail) => (StatusCode::NOT_FOUND, "NOT_FOUND", detail),
            ApiError::BadRequest(detail) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", detail),
            ApiError::Conflict(detail) => (StatusCode::CONFLICT, "CONFLICT", detail),
            ApiError::Internal(detail) => {
                tracing::error!(detail = %detail, "API internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = ErrorBody {
            error: ErrorDetail { code, message },
        };
        (status, Json(body)).into_response()
    }
}

impl From<AssistantError> for ApiError {
    fn from(err: AssistantError) -> Self {
        match err {
            AssistantError::PatientNotFound(_) => ApiError::NotFound(err.to_string()),
            AssistantError::PatientMismatch { .. } => ApiError::Conflict(err.to_string()),
            AssistantError::InvalidPatient(_) | AssistantError::Parse(_) => {
                ApiError::BadRequest(err.to_string())
            }
            AssistantError::Repository(_) => ApiError::Internal(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assistant_errors_map_to_status_codes() {
        let status = |err: AssistantError| ApiError::from(err).into_response().status();

        assert_eq!(
            status(AssistantError::PatientNotFound("p-9".into())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status(AssistantError::PatientMismatch {
                expected: "p-1".into(),
                actual: "p-2".into(),
            }),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status(AssistantError::InvalidPatient("pain level".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status(AssistantError::Repository("lock".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
