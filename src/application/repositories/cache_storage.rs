use async_trait::async_trait;

use crate::{
    application::error::CacheStorageError,
    domain::models::cache::CachedResponse,
};

/// Named caches of origin-relative URL to response. Writes to an existing key overwrite.
#[async_trait]
pub trait CacheStorage: Send + Sync {
    /// Creates the cache if it does not exist yet.
    async fn open(&self, cache_name: &str) -> Result<(), CacheStorageError>;
    async fn keys(&self) -> Result<Vec<String>, CacheStorageError>;
    /// Returns whether a cache by that name existed.
    async fn delete(&self, cache_name: &str) -> Result<bool, CacheStorageError>;
    async fn get(
        &self,
        cache_name: &str,
        url: &str,
    ) -> Result<Option<CachedResponse>, CacheStorageError>;
    async fn put(
        &self,
        cache_name: &str,
        url: &str,
        response: CachedResponse,
    ) -> Result<(), CacheStorageError>;
}
