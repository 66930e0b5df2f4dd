//! Error responses: every failure is returned as `{"error": "<message>"}`.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use super::types::ErrorResponse;
use crate::provider::UpstreamError;
use crate::task::ValidationError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    #[error("Method not allowed")]
    MethodNotAllowed,
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
        }
    }

    /// Text placed in the `error` field.
    pub fn message(&self) -> String {
        match self {
            ApiError::Upstream(e) => e.user_message(),
            other => other.to_string(),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Validation(ValidationError(format!(
            "Invalid request body: {}",
            rejection.body_text()
        )))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status_code(),
            Json(ErrorResponse {
                error: self.message(),
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ApiError::from(ValidationError("site is required".to_string())).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(UpstreamError::Network("boom".to_string())).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::MethodNotAllowed.status_code(),
            StatusCode::METHOD_NOT_ALLOWED
        );
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            ApiError::from(ValidationError("site is required".to_string())).message(),
            "site is required"
        );
        assert_eq!(
            ApiError::from(UpstreamError::Status {
                status: 500,
                message: None
            })
            .message(),
            "An error occurred"
        );
        assert_eq!(ApiError::MethodNotAllowed.message(), "Method not allowed");
    }
}
