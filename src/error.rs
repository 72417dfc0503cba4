//! Service error types with HTTP status code mapping.
//!
//! [`WatchError`] is the central error type of the service. Each variant
//! maps to a specific HTTP status code and structured JSON error response.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

use crate::client::ClientError;
use crate::domain::BrewId;

/// Structured JSON error response body.
///
/// All error responses follow this shape:
/// ```json
/// {
///   "error": {
///     "code": 2001,
///     "message": "no tracker mounted for brew 42",
///     "details": null
///   }
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with numeric code and human-readable message.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Numeric error code.
    pub code: u32,
    /// Human-readable error message.
    pub message: String,
    /// Optional additional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Service error enum with HTTP status code mapping.
///
/// # Error Code Ranges
///
/// | Range     | Category        | HTTP Status                  |
/// |-----------|-----------------|------------------------------|
/// | 1000–1999 | Validation      | 400 Bad Request              |
/// | 2000–2999 | State/Not Found | 404 Not Found / 409 Conflict |
/// | 3000–3999 | Server          | 500 Internal Server Error    |
/// | 5000–5999 | Upstream        | 502 / 504 / backend status   |
#[derive(Debug, thiserror::Error)]
pub enum WatchError {
    /// No tracker is mounted for the brew.
    #[error("no tracker mounted for brew {0}")]
    TrackerNotFound(BrewId),

    /// A tracker is already mounted for the brew.
    #[error("brew {0} is already tracked")]
    TrackerExists(BrewId),

    /// Request validation failed.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The brewing backend failed the request.
    #[error("backend error: {0}")]
    Upstream(#[from] ClientError),

    /// Configuration could not be loaded.
    #[error("configuration error: {0}")]
    Config(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl WatchError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::InvalidRequest(_) => 1001,
            Self::TrackerNotFound(_) => 2001,
            Self::TrackerExists(_) => 2002,
            Self::Internal(_) => 3000,
            Self::Config(_) => 3001,
            Self::Upstream(err) => match err {
                ClientError::Connection(_) => 5001,
                ClientError::Timeout => 5002,
                ClientError::Status { .. } => 5003,
                ClientError::Malformed(_) => 5004,
                ClientError::InvalidRequest(_) => 5005,
            },
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::TrackerNotFound(_) => StatusCode::NOT_FOUND,
            Self::TrackerExists(_) => StatusCode::CONFLICT,
            Self::Internal(_) | Self::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Upstream(ClientError::Timeout) => StatusCode::GATEWAY_TIMEOUT,
            Self::Upstream(ClientError::Status { status, .. })
                if (400..500).contains(status) =>
            {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            Self::Upstream(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for WatchError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::warn!(error = %self, code = self.error_code(), "request failed");
        }
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.error_code(),
                message: self.to_string(),
                details: None,
            },
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_maps_to_404() {
        let err = WatchError::TrackerNotFound(BrewId::new("9"));
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(err.error_code(), 2001);
    }

    #[test]
    fn conflict_maps_to_409() {
        let err = WatchError::TrackerExists(BrewId::new("9"));
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
    }

    #[test]
    fn upstream_client_errors_pass_through() {
        let err = WatchError::from(ClientError::Status {
            status: 404,
            message: "brew not found".to_string(),
        });
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(err.error_code(), 5003);
    }

    #[test]
    fn upstream_server_errors_are_bad_gateway() {
        let err = WatchError::from(ClientError::Status {
            status: 503,
            message: "down".to_string(),
        });
        assert_eq!(err.status_code(), StatusCode::BAD_GATEWAY);
        assert_eq!(
            WatchError::from(ClientError::Timeout).status_code(),
            StatusCode::GATEWAY_TIMEOUT
        );
    }

    #[test]
    fn response_carries_status() {
        let response = WatchError::InvalidRequest("bad".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
