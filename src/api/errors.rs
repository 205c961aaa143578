use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use std::fmt;
use tracing::error;

use crate::errors::Error;
use crate::llm::UpstreamError;

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub message: String,
    pub code: u16,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ApiError({}, {})", self.code, self.message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body = axum::Json(self);
        (status, body).into_response()
    }
}

/// Helper function to create API errors
pub fn api_error(status: StatusCode, message: &str) -> ApiError {
    ApiError {
        message: message.to_string(),
        code: status.as_u16(),
    }
}

impl From<UpstreamError> for ApiError {
    fn from(err: UpstreamError) -> Self {
        error!("upstream failure: {}", err);
        api_error(StatusCode::BAD_GATEWAY, &err.to_string())
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        match err {
            Error::NotFound(what) => api_error(StatusCode::NOT_FOUND, &format!("{} not found", what)),
            Error::InvalidUserInput(message) => {
                api_error(StatusCode::UNPROCESSABLE_ENTITY, &message)
            }
            Error::Upstream(upstream) => upstream.into(),
            other => {
                error!("request failed: {}", other);
                api_error(StatusCode::INTERNAL_SERVER_ERROR, &other.to_string())
            }
        }
    }
}
