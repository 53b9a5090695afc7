use std::env;
use std::path::PathBuf;
use std::time::Duration;

use agrimix_store::SettingsCache;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub db_path: PathBuf,
    pub settings_cache_ttl: Duration,
    pub cors_allowed_origins: Vec<String>,
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3001,
            db_path: PathBuf::from("database.sqlite"),
            settings_cache_ttl: SettingsCache::DEFAULT_TTL,
            cors_allowed_origins: vec!["http://localhost:3000".to_string()],
            max_body_bytes: 256 * 1024,
        }
    }
}

impl ServerConfig {
    /// Environment-driven configuration; every knob falls back to the
    /// default above.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            port: env_u16("AGRIMIX_PORT", defaults.port),
            db_path: env::var("AGRIMIX_DB_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.db_path),
            settings_cache_ttl: Duration::from_secs(env_u64(
                "AGRIMIX_SETTINGS_TTL_SECS",
                defaults.settings_cache_ttl.as_secs(),
            )),
            cors_allowed_origins: env_list("AGRIMIX_CORS_ORIGINS")
                .unwrap_or(defaults.cors_allowed_origins),
            max_body_bytes: env_usize("AGRIMIX_MAX_BODY_BYTES", defaults.max_body_bytes),
        }
    }
}

fn env_u16(name: &str, default: u16) -> u16 {
    env::var(name)
        .ok()
        .and_then(|v| v.parse::<u16>().ok())
        .unwrap_or(default)
}

fn env_u64(name: &str, default: u64) -> u64 {
    env::var(name)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(default)
}

fn env_usize(name: &str, default: usize) -> usize {
    env::var(name)
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(default)
}

fn env_list(name: &str) -> Option<Vec<String>> {
    env::var(name).ok().map(|raw| {
        raw.split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(str::to_string)
            .collect()
    })
}
