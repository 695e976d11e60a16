/// Configuration management for the govdir API
use crate::error::{ApiError, ApiResult};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Main server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub service: ServiceConfig,
    pub storage: StorageConfig,
    pub directory: DirectoryConfig,
    pub cache: CacheConfig,
    pub logging: LoggingConfig,
}

/// Service-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub hostname: String,
    pub port: u16,
    pub version: String,
}

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub data_directory: PathBuf,
    pub directory_db: PathBuf,
}

/// Directory configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectoryConfig {
    /// Allow-listed extensions, leading dot included (e.g. ".gov.uk")
    pub extensions: Vec<String>,
}

/// Handle cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Seconds a cached handle list stays fresh (default: 300)
    pub ttl_secs: u64,
    /// Seconds between background sweeps of expired entries
    pub sweep_interval_secs: u64,
}

impl CacheConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

impl ServerConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> ApiResult<Self> {
        dotenv::dotenv().ok();

        let hostname = env::var("GOVDIR_HOSTNAME").unwrap_or_else(|_| "localhost".to_string());
        let port = env::var("GOVDIR_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .map_err(|_| ApiError::Validation("Invalid port number".to_string()))?;
        let version = env::var("GOVDIR_VERSION")
            .unwrap_or_else(|_| env!("CARGO_PKG_VERSION").to_string());

        let data_directory: PathBuf = env::var("GOVDIR_DATA_DIRECTORY")
            .unwrap_or_else(|_| "./data".to_string())
            .into();
        let directory_db = env::var("GOVDIR_DIRECTORY_DB_LOCATION")
            .map(PathBuf::from)
            .unwrap_or_else(|_| data_directory.join("directory.sqlite"));

        // Parse extensions from comma-separated list
        let extensions = env::var("GOVDIR_EXTENSIONS")
            .unwrap_or_else(|_| ".gov,.gov.uk,.gov.br".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect::<Vec<String>>();

        let cache_ttl_secs = env::var("GOVDIR_CACHE_TTL_SECS")
            .unwrap_or_else(|_| "300".to_string())
            .parse()
            .unwrap_or(300);
        let sweep_interval_secs = env::var("GOVDIR_CACHE_SWEEP_INTERVAL_SECS")
            .unwrap_or_else(|_| "60".to_string())
            .parse()
            .unwrap_or(60);

        let log_level = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        Ok(ServerConfig {
            service: ServiceConfig {
                hostname,
                port,
                version,
            },
            storage: StorageConfig {
                data_directory,
                directory_db,
            },
            directory: DirectoryConfig { extensions },
            cache: CacheConfig {
                ttl_secs: cache_ttl_secs,
                sweep_interval_secs,
            },
            logging: LoggingConfig { level: log_level },
        })
    }

    /// Validate configuration
    pub fn validate(&self) -> ApiResult<()> {
        if self.service.hostname.is_empty() {
            return Err(ApiError::Validation("Hostname cannot be empty".to_string()));
        }

        if self.directory.extensions.is_empty() {
            return Err(ApiError::Validation(
                "Extension allow-list cannot be empty".to_string(),
            ));
        }

        if self.cache.ttl_secs == 0 {
            return Err(ApiError::Validation(
                "Cache TTL must be at least one second".to_string(),
            ));
        }

        if self.cache.sweep_interval_secs == 0 {
            return Err(ApiError::Validation(
                "Cache sweep interval must be at least one second".to_string(),
            ));
        }

        Ok(())
    }
}
