//! Domain error to HTTP response mapping

use ausmass_domain::AusmassError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::warn;

/// Wrapper so domain errors can be returned straight from handlers.
pub struct ApiError(pub AusmassError);

impl From<AusmassError> for ApiError {
    fn from(err: AusmassError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            AusmassError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AusmassError::NotFound(_) => StatusCode::NOT_FOUND,
            AusmassError::Auth(_) => StatusCode::UNAUTHORIZED,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        warn!(status = status.as_u16(), error = %self.0, "request failed");

        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}
