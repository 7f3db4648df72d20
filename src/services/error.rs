use thiserror::Error;

use crate::application::error::{CacheAgentError, UploadError};

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Request timeout")]
    Timeout,

    #[error("Connection failed: {0}")]
    Connect(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Unreadable response: {0}")]
    Decode(String),

    #[error("Transport error: {0}")]
    Other(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            TransportError::Timeout
        } else if error.is_connect() {
            TransportError::Connect(error.to_string())
        } else if error.is_decode() {
            TransportError::Decode(error.to_string())
        } else if error.is_builder() {
            TransportError::InvalidUrl(error.to_string())
        } else {
            TransportError::Other(error.to_string())
        }
    }
}

impl From<TransportError> for UploadError {
    fn from(error: TransportError) -> Self {
        UploadError::Network(error.to_string())
    }
}

impl From<TransportError> for CacheAgentError {
    fn from(error: TransportError) -> Self {
        CacheAgentError::Network(error.to_string())
    }
}
