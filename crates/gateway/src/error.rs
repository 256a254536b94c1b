use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use detector::DetectorError;
use serde_json::json;

/// Uniform error surface for every handler: one JSON body, no partial
/// results.
#[derive(Debug)]
pub enum ApiError {
    /// The request itself was unusable (missing upload, undecodable image,
    /// unreadable path).
    BadRequest(String),
    /// Detection or mapping failed server-side.
    Internal(String),
}

impl From<DetectorError> for ApiError {
    fn from(err: DetectorError) -> Self {
        match err {
            DetectorError::InvalidImage(msg) => ApiError::BadRequest(format!("invalid image: {msg}")),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Internal(msg) => {
                tracing::error!(error = %msg, "Request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}
