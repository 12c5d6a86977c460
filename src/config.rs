use std::env;
use std::sync::OnceLock;

use crate::brokers::remote_write::QueueManagerConfig;

static CONFIG: OnceLock<Config> = OnceLock::new();

// --- CONFIG AGGREGATOR ---

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub remote_write: RemoteWriteConfig,
}

impl Config {
    pub fn global() -> &'static Config {
        CONFIG.get_or_init(Self::load)
    }

    fn load() -> Self {
        dotenv::dotenv().ok();
        Self {
            server: ServerConfig::load(),
            remote_write: RemoteWriteConfig::load(),
        }
    }
}

// --- MODULES ---

// SERVER
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub log_level: String,
}

impl ServerConfig {
    fn load() -> Self {
        Self {
            host:      get_env("SERVER_HOST", "127.0.0.1"),
            port:      get_env("SERVER_PORT", "9095"),
            log_level: get_env("LOG_LEVEL", "info"),
        }
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

// REMOTE WRITE
#[derive(Debug, Clone)]
pub struct RemoteWriteConfig {
    /// (name, endpoint) in declaration order
    pub queues: Vec<(String, String)>,
    pub min_shards: usize,
    pub max_shards: usize,
}

impl RemoteWriteConfig {
    fn load() -> Self {
        let raw: String = get_env("REMOTE_WRITE_QUEUES", "");
        Self {
            queues:     parse_queue_declarations(&raw),
            min_shards: get_env("REMOTE_WRITE_MIN_SHARDS", "1"),
            max_shards: get_env("REMOTE_WRITE_MAX_SHARDS", "50"),
        }
    }

    pub fn queue_config(&self) -> QueueManagerConfig {
        QueueManagerConfig {
            min_shards: self.min_shards,
            max_shards: self.max_shards,
        }
    }
}

/// Parses `name=endpoint,name=endpoint`. Malformed entries are skipped,
/// a repeated name keeps its first declaration.
pub fn parse_queue_declarations(raw: &str) -> Vec<(String, String)> {
    let mut queues: Vec<(String, String)> = Vec::new();
    for entry in raw.split(',').map(str::trim).filter(|e| !e.is_empty()) {
        let Some((name, endpoint)) = entry.split_once('=') else {
            tracing::warn!("Config: ignoring remote write entry '{}' (expected name=endpoint)", entry);
            continue;
        };
        let (name, endpoint) = (name.trim(), endpoint.trim());
        if name.is_empty() || endpoint.is_empty() {
            tracing::warn!("Config: ignoring remote write entry '{}' (empty name or endpoint)", entry);
            continue;
        }
        if queues.iter().any(|(n, _)| n == name) {
            tracing::warn!("Config: duplicate remote write queue '{}', keeping the first", name);
            continue;
        }
        queues.push((name.to_string(), endpoint.to_string()));
    }
    queues
}

// --- PRIVATE HELPER ---

fn get_env<T: std::str::FromStr>(key: &str, default: &str) -> T {
    let raw = env::var(key).unwrap_or_else(|_| default.to_string());
    parse_or_default(key, &raw, default)
}

fn parse_or_default<T: std::str::FromStr>(key: &str, raw: &str, default: &str) -> T {
    match raw.parse() {
        Ok(value) => value,
        Err(_) => {
            tracing::warn!("Config: {}='{}' is not valid, using default '{}'", key, raw, default);
            match default.parse() {
                Ok(value) => value,
                Err(_) => panic!("Config error: default for {} must be valid", key),
            }
        }
    }
}
