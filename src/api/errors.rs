// src/api/errors.rs
use axum::{response::{IntoResponse, Response}, http::StatusCode, Json};
use serde_json::json;
use tracing::{debug, error};

use crate::error::Error;

/// Result type of API handlers
pub type ApiResult<T> = std::result::Result<T, Error>;

impl Error {
    /// HTTP status reported for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::Auth(_) => StatusCode::UNAUTHORIZED,
            Error::MalformedQuery(_)
            | Error::MalformedBody(_)
            | Error::InvalidSerial(_) => StatusCode::BAD_REQUEST,
            Error::RemoteUnavailable(_)
            | Error::RemoteError(_)
            | Error::Issuer(_) => StatusCode::BAD_GATEWAY,
            Error::Storage(_)
            | Error::Config(_)
            | Error::Io(_)
            | Error::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_message = self.to_string();

        if status.is_server_error() {
            error!("Request failed: {}", error_message);
        } else {
            debug!("Request rejected: {}", error_message);
        }

        let body = Json(json!({
            "error": error_message
        }));

        (status, body).into_response()
    }
}
