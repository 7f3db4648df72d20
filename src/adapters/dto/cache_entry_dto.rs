use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::models::cache::{CachedResponse, ResponseType};

/// One line of a disk cache's `index.json`; the body lives in `<body_file>`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntryDTO {
    pub url: String,
    pub status: u16,
    #[serde(rename = "responseType")]
    pub response_type: ResponseType,
    pub headers: Vec<(String, String)>,
    #[serde(rename = "bodyFile")]
    pub body_file: String,
    #[serde(rename = "storedAt")]
    pub stored_at: DateTime<Utc>,
}

impl CacheEntryDTO {
    pub fn from_response(url: &str, response: &CachedResponse, body_file: String) -> Self {
        Self {
            url: url.to_string(),
            status: response.status,
            response_type: response.response_type,
            headers: response.headers.clone(),
            body_file,
            stored_at: Utc::now(),
        }
    }

    pub fn into_response(self, body: bytes::Bytes) -> CachedResponse {
        CachedResponse {
            status: self.status,
            response_type: self.response_type,
            headers: self.headers,
            body,
        }
    }
}
