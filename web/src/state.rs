use moka::future::Cache;

use crate::config::ServerConfig;

/// Shared server state: configuration plus the per-process cache of
/// (start, end) -> discovered path.
pub struct AppState {
    pub config: ServerConfig,
    pub path_cache: Cache<(String, String), Vec<String>>,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Self {
        let path_cache = Cache::builder().max_capacity(10_000).build();
        Self { config, path_cache }
    }
}
