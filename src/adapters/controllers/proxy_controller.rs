use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    extract::{Request, State},
    http::{HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use tracing::{debug, warn};

use crate::{
    application::{cache_agent::CacheAgent, error::CacheAgentError},
    domain::{
        config::upload::MAX_UPLOAD_SIZE,
        models::cache::{CachedResponse, FetchRequest},
    },
};

/// Upload ceiling plus room for the multipart envelope.
const MAX_REQUEST_BODY: usize = MAX_UPLOAD_SIZE as usize + 1024 * 1024;

impl IntoResponse for CachedResponse {
    fn into_response(self) -> Response {
        let mut response = Response::new(Body::from(self.body));
        *response.status_mut() =
            StatusCode::from_u16(self.status).unwrap_or(StatusCode::BAD_GATEWAY);

        let headers = response.headers_mut();
        for (name, value) in &self.headers {
            match (
                HeaderName::from_bytes(name.as_bytes()),
                HeaderValue::from_str(value),
            ) {
                (Ok(name), Ok(value)) => {
                    headers.append(name, value);
                }
                _ => debug!("Dropping unrepresentable header {}", name),
            }
        }

        response
    }
}

pub struct ProxyController;

impl ProxyController {
    /// Every request the page issues passes through here.
    pub async fn intercept(
        State(cache_agent): State<Arc<CacheAgent>>,
        request: Request,
    ) -> Result<Response, CacheAgentError> {
        let (parts, body) = request.into_parts();

        let url = parts
            .uri
            .path_and_query()
            .map(|pq| pq.as_str().to_string())
            .unwrap_or_else(|| "/".to_string());

        let body = match to_bytes(body, MAX_REQUEST_BODY).await {
            Ok(body) => body,
            Err(e) => {
                warn!("Rejected request body for {}: {}", url, e);
                return Ok((StatusCode::PAYLOAD_TOO_LARGE, "Request body too large").into_response());
            }
        };

        let headers = parts
            .headers
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();

        let fetch_request = FetchRequest {
            method: parts.method.as_str().to_string(),
            url,
            headers,
            body,
        };

        let response = cache_agent.handle_fetch(&fetch_request).await?;
        Ok(response.into_response())
    }
}
