//! Offline cache agent: a versioned asset cache with an install, activate and
//! fetch lifecycle. The hosting runtime drives the phases in order; the agent
//! only records where it is.

use std::sync::{Arc, Mutex};

use futures::future::try_join_all;
use tracing::{debug, error, info, warn};

use crate::{
    application::{
        error::CacheAgentError, repositories::cache_storage::CacheStorage, services::Network,
    },
    domain::{
        config::cache::CacheConfig,
        models::cache::{CachedResponse, FetchRequest},
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentPhase {
    Installing,
    Installed,
    Activating,
    Active,
}

pub struct CacheAgent {
    config: CacheConfig,
    storage: Arc<dyn CacheStorage>,
    network: Arc<dyn Network>,
    phase: Mutex<AgentPhase>,
}

impl CacheAgent {
    pub fn new(
        config: CacheConfig,
        storage: Arc<dyn CacheStorage>,
        network: Arc<dyn Network>,
    ) -> Self {
        Self {
            config,
            storage,
            network,
            phase: Mutex::new(AgentPhase::Installing),
        }
    }

    pub fn phase(&self) -> AgentPhase {
        *self.phase.lock().unwrap()
    }

    fn set_phase(&self, phase: AgentPhase) {
        *self.phase.lock().unwrap() = phase;
    }

    /// Opens the current cache and fills it with the manifest. Nothing is
    /// written unless every entry came back with a 2xx status.
    pub async fn install(&self) -> Result<(), CacheAgentError> {
        self.set_phase(AgentPhase::Installing);
        self.storage.open(&self.config.cache_name).await?;
        info!("Opened cache {}", self.config.cache_name);

        let responses = try_join_all(self.config.manifest.iter().map(|url| async move {
            let request = FetchRequest::get(url.clone());
            let response =
                self.network
                    .fetch(&request)
                    .await
                    .map_err(|e| CacheAgentError::Installation {
                        url: url.clone(),
                        reason: e.to_string(),
                    })?;

            if !response.is_ok() {
                return Err(CacheAgentError::Installation {
                    url: url.clone(),
                    reason: format!("unexpected status {}", response.status),
                });
            }

            Ok((url, response))
        }))
        .await
        .inspect_err(|e| error!("Install failed: {}", e))?;

        for (url, response) in responses {
            self.storage
                .put(&self.config.cache_name, url, response)
                .await?;
        }

        info!(
            "Cached {} manifest entries in {}",
            self.config.manifest.len(),
            self.config.cache_name
        );
        self.set_phase(AgentPhase::Installed);
        Ok(())
    }

    /// Deletes every cache generation except the current one.
    pub async fn activate(&self) -> Result<Vec<String>, CacheAgentError> {
        self.set_phase(AgentPhase::Activating);

        let stale: Vec<String> = self
            .storage
            .keys()
            .await?
            .into_iter()
            .filter(|name| *name != self.config.cache_name)
            .collect();

        for name in &stale {
            self.storage.delete(name).await?;
            info!("Deleted stale cache {}", name);
        }

        self.set_phase(AgentPhase::Active);
        Ok(stale)
    }

    /// Cache first, then network with cache fill. Falls back to the cached
    /// home page when the network is unreachable.
    pub async fn handle_fetch(
        &self,
        request: &FetchRequest,
    ) -> Result<CachedResponse, CacheAgentError> {
        match self.respond(request).await {
            Ok(response) => Ok(response),
            Err(e) => {
                warn!("Fetch failed: {}", e);
                match self
                    .storage
                    .get(&self.config.cache_name, &self.config.fallback_url)
                    .await
                {
                    Ok(Some(fallback)) => {
                        info!("Serving cached {} for {}", self.config.fallback_url, request.url);
                        Ok(fallback)
                    }
                    Ok(None) => Err(CacheAgentError::Interception {
                        url: request.url.clone(),
                        reason: e.to_string(),
                    }),
                    Err(lookup) => {
                        warn!("Fallback lookup failed for {}: {}", request.url, lookup);
                        Err(CacheAgentError::Interception {
                            url: request.url.clone(),
                            reason: format!("{}; fallback unavailable: {}", e, lookup),
                        })
                    }
                }
            }
        }
    }

    async fn respond(&self, request: &FetchRequest) -> Result<CachedResponse, CacheAgentError> {
        if request.is_get() {
            if let Some(cached) = self
                .storage
                .get(&self.config.cache_name, request.cache_key())
                .await?
            {
                debug!("Cache hit for {}", request.url);
                return Ok(cached);
            }
        }

        let response = self.network.fetch(request).await?;

        if !response.is_cacheable() {
            debug!(
                "Not caching {} (status {}, {:?})",
                request.url, response.status, response.response_type
            );
            return Ok(response);
        }

        if self.config.is_excluded(&request.url) || !request.is_get() {
            return Ok(response);
        }

        // Bodies are `Bytes`, so the copy handed to the cache shares the buffer.
        if let Err(e) = self
            .storage
            .put(&self.config.cache_name, request.cache_key(), response.clone())
            .await
        {
            warn!("Failed to cache {}: {}", request.url, e);
        }

        Ok(response)
    }
}
