use axum::extract::FromRef;
use std::sync::Arc;

use crate::application::cache_agent::CacheAgent;

#[derive(Clone, FromRef)]
pub struct AppState {
    pub cache_agent: Arc<CacheAgent>,
}
