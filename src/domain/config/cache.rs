use serde::{Deserialize, Serialize};

pub const CACHE_NAME: &str = "realface-cache-v1";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CacheConfig {
    /// Version tag of the only cache generation allowed to survive activation.
    #[serde(rename = "cacheName")]
    pub cache_name: String,
    pub manifest: Vec<String>,
    /// Requests whose URL contains this are never written to the cache.
    #[serde(rename = "excludedPattern")]
    pub excluded_pattern: String,
    #[serde(rename = "fallbackUrl")]
    pub fallback_url: String,
}

impl CacheConfig {
    pub fn with_cache_name(mut self, cache_name: impl Into<String>) -> Self {
        self.cache_name = cache_name.into();
        self
    }

    pub fn is_excluded(&self, url: &str) -> bool {
        url.contains(&self.excluded_pattern)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            cache_name: CACHE_NAME.to_string(),
            manifest: vec![
                "/".to_string(),
                "/static/detector/css/style.css".to_string(),
                "/static/detector/js/main.js".to_string(),
                "/static/detector/manifest.json".to_string(),
            ],
            excluded_pattern: "/analyze/".to_string(),
            fallback_url: "/".to_string(),
        }
    }
}
