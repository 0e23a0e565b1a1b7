//! Error handlers
//!
//! Converts store errors into HTTP responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::error::types::StoreError;

/// JSON body returned for every failed request
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: &'static str,
    pub message: String,
}

impl From<&StoreError> for ErrorResponse {
    fn from(err: &StoreError) -> Self {
        Self {
            error: err.code(),
            message: err.public_message(),
        }
    }
}

/// Convert error to HTTP status
pub fn error_to_status(err: &StoreError) -> StatusCode {
    StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

impl IntoResponse for StoreError {
    fn into_response(self) -> Response {
        let status = error_to_status(&self);
        (status, Json(ErrorResponse::from(&self))).into_response()
    }
}
