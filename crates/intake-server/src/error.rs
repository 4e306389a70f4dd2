//! Error-to-response mapping for the HTTP surface.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

/// Errors surfaced to webhook callers.
///
/// Validation failures are the only errors a caller ever sees as a 4xx;
/// everything downstream of the decode is absorbed into a degraded 200.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The inbound payload failed the strict decode.
    #[error("invalid payload: {0}")]
    Validation(String),

    /// The notification body was structurally valid but unusable.
    #[error("{0}")]
    BadNotification(&'static str),
}

impl ApiError {
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::BadNotification(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(json!({
            "status": "error",
            "message": self.to_string(),
        }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_are_bad_request() {
        assert_eq!(
            ApiError::Validation("missing data".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::BadNotification("case_id missing").status_code(),
            StatusCode::BAD_REQUEST
        );
    }
}
