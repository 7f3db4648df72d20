use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::{error, warn};

use crate::application::error::CacheAgentError;

impl IntoResponse for CacheAgentError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            CacheAgentError::Installation { ref url, ref reason } => {
                error!("Cache not installed ({}): {}", url, reason);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "Offline cache unavailable".to_string(),
                )
            }
            CacheAgentError::Network(ref msg) => {
                warn!("Origin unreachable: {}", msg);
                (StatusCode::BAD_GATEWAY, "Network error".to_string())
            }
            CacheAgentError::Interception { ref url, ref reason } => {
                warn!("No response for {}: {}", url, reason);
                (StatusCode::BAD_GATEWAY, "Network error".to_string())
            }
            CacheAgentError::Storage(ref e) => {
                error!("Cache storage error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}
