use async_trait::async_trait;

use crate::{
    application::error::CacheAgentError,
    domain::models::cache::{CachedResponse, FetchRequest},
};

#[async_trait]
pub trait Network: Send + Sync {
    /// Fails only when no response arrived at all; HTTP error statuses are responses.
    async fn fetch(&self, request: &FetchRequest) -> Result<CachedResponse, CacheAgentError>;
}
