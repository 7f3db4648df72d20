use std::{
    collections::{BTreeMap, HashMap},
    sync::RwLock,
};

use async_trait::async_trait;

use crate::{
    application::{error::CacheStorageError, repositories::cache_storage::CacheStorage},
    domain::models::cache::CachedResponse,
};

/// Process-local cache storage. Also the fake used by tests.
#[derive(Default)]
pub struct MemoryCacheStorage {
    caches: RwLock<BTreeMap<String, HashMap<String, CachedResponse>>>,
}

impl MemoryCacheStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CacheStorage for MemoryCacheStorage {
    async fn open(&self, cache_name: &str) -> Result<(), CacheStorageError> {
        self.caches
            .write()
            .unwrap()
            .entry(cache_name.to_string())
            .or_default();
        Ok(())
    }

    async fn keys(&self) -> Result<Vec<String>, CacheStorageError> {
        Ok(self.caches.read().unwrap().keys().cloned().collect())
    }

    async fn delete(&self, cache_name: &str) -> Result<bool, CacheStorageError> {
        Ok(self.caches.write().unwrap().remove(cache_name).is_some())
    }

    async fn get(
        &self,
        cache_name: &str,
        url: &str,
    ) -> Result<Option<CachedResponse>, CacheStorageError> {
        Ok(self
            .caches
            .read()
            .unwrap()
            .get(cache_name)
            .and_then(|cache| cache.get(url))
            .cloned())
    }

    async fn put(
        &self,
        cache_name: &str,
        url: &str,
        response: CachedResponse,
    ) -> Result<(), CacheStorageError> {
        self.caches
            .write()
            .unwrap()
            .entry(cache_name.to_string())
            .or_default()
            .insert(url.to_string(), response);
        Ok(())
    }
}
