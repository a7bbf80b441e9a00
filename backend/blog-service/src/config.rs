/// Configuration management for blog-service
///
/// Loads configuration from environment variables.
use serde::{Deserialize, Serialize};

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application settings
    pub app: AppConfig,
    /// Database configuration
    pub database: DatabaseConfig,
    /// Post store backend selection
    pub store: StoreConfig,
    /// Feed listing configuration
    pub feed: FeedConfig,
}

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application environment (dev, staging, prod)
    pub env: String,
    /// Server host to bind to
    pub host: String,
    /// Server port to bind to
    pub port: u16,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Database URL
    pub url: String,
    /// Max connections in pool
    pub max_connections: u32,
}

/// Which Post Store implementation backs the service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Postgres,
    Memory,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    pub backend: StoreBackend,
}

/// Feed listing configuration (page size, index cache window)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Posts per listing page
    pub page_size: usize,
    /// TTL for the cached global feed, in seconds
    pub index_cache_ttl_secs: u64,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, String> {
        Ok(Config {
            app: AppConfig {
                env: std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
                host: std::env::var("BLOG_SERVICE_HOST")
                    .unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: std::env::var("BLOG_SERVICE_PORT")
                    .ok()
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(8083),
            },
            database: DatabaseConfig {
                url: std::env::var("DATABASE_URL")
                    .unwrap_or_else(|_| "postgresql://localhost/quillpad".to_string()),
                max_connections: std::env::var("DATABASE_MAX_CONNECTIONS")
                    .ok()
                    .and_then(|c| c.parse().ok())
                    .unwrap_or(10),
            },
            store: StoreConfig {
                backend: match std::env::var("BLOG_STORE_BACKEND") {
                    Ok(value) if value.eq_ignore_ascii_case("memory") => StoreBackend::Memory,
                    Ok(value) if value.eq_ignore_ascii_case("postgres") => StoreBackend::Postgres,
                    Ok(value) => {
                        return Err(format!(
                            "Invalid BLOG_STORE_BACKEND '{}': expected 'postgres' or 'memory'",
                            value
                        ))
                    }
                    Err(_) => StoreBackend::Postgres,
                },
            },
            feed: FeedConfig {
                page_size: std::env::var("FEED_PAGE_SIZE")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(10),
                index_cache_ttl_secs: std::env::var("FEED_INDEX_CACHE_TTL_SECS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(20),
            },
        })
    }
}
