use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use agrimix_core::{Clock, SystemClock};
use agrimix_store::{bootstrap, SettingsCache, StoreError};
use rusqlite::Connection;
use tokio::sync::Mutex;

use crate::ServerConfig;

/// Shared server state. One connection guarded by an async mutex carries
/// every query; SQLite plus serialized access gives the storage layer its
/// single-writer model.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Mutex<Connection>>,
    pub config: Arc<ServerConfig>,
    pub settings_cache: Arc<SettingsCache>,
    pub clock: Arc<dyn Clock>,
    request_counter: Arc<AtomicU64>,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Result<Self, StoreError> {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Test entry point: same wiring, caller-controlled clock.
    pub fn with_clock(config: ServerConfig, clock: Arc<dyn Clock>) -> Result<Self, StoreError> {
        let conn = Connection::open(&config.db_path)?;
        bootstrap(&conn)?;
        let settings_cache = Arc::new(SettingsCache::new(
            config.settings_cache_ttl,
            clock.clone(),
        ));
        Ok(Self {
            db: Arc::new(Mutex::new(conn)),
            config: Arc::new(config),
            settings_cache,
            clock,
            request_counter: Arc::new(AtomicU64::new(1)),
        })
    }

    #[must_use]
    pub fn next_request_id(&self) -> String {
        format!("req-{:08x}", self.request_counter.fetch_add(1, Ordering::Relaxed))
    }
}
