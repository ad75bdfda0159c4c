//! HTTP error mapping

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use crate::auth::AuthError;
use crate::engine::QueryError;

/// Errors surfaced by the HTTP layer
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Unauthorized(#[from] AuthError),

    #[error("Unknown resource: {0}")]
    UnknownResource(String),

    #[error("Malformed request body: {0}")]
    MalformedBody(String),

    #[error(transparent)]
    Query(#[from] QueryError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::UnknownResource(_) => StatusCode::NOT_FOUND,
            ApiError::MalformedBody(_) => StatusCode::BAD_REQUEST,
            ApiError::Query(err) if err.is_canceled() => StatusCode::REQUEST_TIMEOUT,
            ApiError::Query(err) if err.is_client_error() => StatusCode::BAD_REQUEST,
            ApiError::Query(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Unauthorized(err) => err.code(),
            ApiError::UnknownResource(_) => "RG_UNKNOWN_RESOURCE",
            ApiError::MalformedBody(_) => "RG_MALFORMED_REQUEST",
            ApiError::Query(err) => err.code(),
        }
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: &'static str,
    pub status: u16,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorResponse {
            error: self.to_string(),
            code: self.code(),
            status: status.as_u16(),
        };
        (status, Json(body)).into_response()
    }
}
