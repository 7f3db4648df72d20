use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{header::HeaderName, redirect, Client, Method, Url};
use tracing::debug;

use crate::{
    application::{error::CacheAgentError, services::Network},
    domain::models::cache::{CachedResponse, FetchRequest, ResponseType},
    services::error::TransportError,
};

/// Request headers that belong to the hop between page and agent, not to the origin.
const HOP_HEADERS: &[&str] = &[
    "host",
    "connection",
    "keep-alive",
    "proxy-connection",
    "transfer-encoding",
    "upgrade",
    "te",
    "trailer",
    "content-length",
];

/// Response headers that no longer describe the buffered body.
const STRIPPED_RESPONSE_HEADERS: &[&str] = &["transfer-encoding", "connection", "content-length"];

/// Fetches origin-relative requests from a single origin.
pub struct ReqwestNetwork {
    client: Client,
    origin: Url,
}

impl ReqwestNetwork {
    pub fn new(origin: &str) -> Result<Self, TransportError> {
        let origin = Url::parse(origin).map_err(|e| TransportError::InvalidUrl(e.to_string()))?;
        // A 3xx goes back to the page untouched, so redirected content never enters the cache.
        let client = Client::builder()
            .redirect(redirect::Policy::none())
            .build()
            .map_err(TransportError::from)?;

        Ok(Self { client, origin })
    }

    /// Places an origin-relative request on the origin. Only path and query
    /// are taken from the request, so `//other-host/...` stays a path.
    fn resolve(&self, request_url: &str) -> Result<Url, TransportError> {
        let without_fragment = request_url.split('#').next().unwrap_or_default();
        let (path, query) = match without_fragment.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (without_fragment, None),
        };

        let mut url = self.origin.clone();
        if path.starts_with('/') {
            url.set_path(path);
        } else {
            url.set_path(&format!("/{}", path));
        }
        url.set_query(query);
        url.set_fragment(None);

        if !self.same_origin(&url) {
            return Err(TransportError::InvalidUrl(request_url.to_string()));
        }
        Ok(url)
    }

    fn same_origin(&self, url: &Url) -> bool {
        url.scheme() == self.origin.scheme()
            && url.host_str() == self.origin.host_str()
            && url.port_or_known_default() == self.origin.port_or_known_default()
    }
}

#[async_trait]
impl Network for ReqwestNetwork {
    async fn fetch(&self, request: &FetchRequest) -> Result<CachedResponse, CacheAgentError> {
        let url = self.resolve(&request.url)?;
        let method = Method::from_bytes(request.method.as_bytes())
            .map_err(|e| TransportError::Other(e.to_string()))?;

        let mut builder = self.client.request(method, url.clone());
        for (name, value) in &request.headers {
            if HOP_HEADERS.contains(&name.to_ascii_lowercase().as_str()) {
                continue;
            }
            if let Ok(name) = HeaderName::from_bytes(name.as_bytes()) {
                builder = builder.header(name, value);
            }
        }
        if !request.body.is_empty() {
            builder = builder.body(request.body.clone());
        }

        let response = builder.send().await.map_err(TransportError::from)?;

        let response_type = if self.same_origin(response.url()) {
            ResponseType::Basic
        } else {
            ResponseType::Opaque
        };
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter(|(name, _)| !STRIPPED_RESPONSE_HEADERS.contains(&name.as_str()))
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body: Bytes = response.bytes().await.map_err(TransportError::from)?;

        debug!("{} {} -> {} ({:?})", request.method, url, status, response_type);

        Ok(CachedResponse {
            status,
            response_type,
            headers,
            body,
        })
    }
}
