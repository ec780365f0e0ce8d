//! Error responses for the API endpoints.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::cors;

/// Everything that can go wrong before a relayed response starts flowing.
/// Failures after the status line is on the wire are not representable here;
/// those are logged at the point of failure and the connection is torn down.
#[derive(Debug, PartialEq, Eq)]
pub enum RelayError {
    /// `url` query parameter absent or empty.
    MissingUrl,
    /// `url` present but not an absolute http(s) URL with a host.
    InvalidUrl,
    /// An access key is required and the supplied one does not match.
    Unauthorized,
    /// Upstream answered with a non-success status; its body is discarded.
    Upstream(StatusCode),
    /// Upstream unreachable or the exchange failed before any bytes were relayed.
    Fetch,
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            RelayError::MissingUrl => {
                (StatusCode::BAD_REQUEST, "Missing 'url' parameter".to_string())
            }
            RelayError::InvalidUrl => {
                (StatusCode::BAD_REQUEST, "Invalid 'url' parameter".to_string())
            }
            RelayError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized".to_string()),
            RelayError::Upstream(code) => (
                code,
                format!(
                    "Upstream error: {}",
                    code.canonical_reason().unwrap_or("Unknown Error")
                ),
            ),
            RelayError::Fetch => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Proxy request failed".to_string(),
            ),
        };

        let mut response = (status, Json(json!({ "error": message }))).into_response();
        cors::apply_cors(response.headers_mut());
        response
    }
}
