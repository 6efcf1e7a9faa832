//! Application configuration from file and environment variables
//!
//! Configuration is loaded with the following priority (highest to lowest):
//! 1. Environment variables (prefixed with HERBARIUM_)
//! 2. Config file (config.toml)
//! 3. Default values
//!
//! Secrets like the database URL and S3 credentials stay in environment
//! variables, not in the config file.

use config::{Config, ConfigError, Environment, File};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// Global application configuration
pub static APP_CONFIG: Lazy<AppConfig> = Lazy::new(|| {
    AppConfig::load().unwrap_or_else(|e| {
        log::warn!("Failed to load config file, using defaults: {}", e);
        AppConfig::default()
    })
});

/// Site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub name: String,
    /// Public base URL, used to build stored file URLs.
    pub base_url: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            name: "Herbarium".to_string(),
            base_url: "http://localhost:8080".to_string(),
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

/// File storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Backend: "local" or "s3"
    pub backend: String,
    /// Base directory for the local backend
    pub local_path: String,
    /// Bucket name for the s3 backend
    pub s3_bucket: String,
    /// Region name for the s3 backend, e.g. "us-east-1"
    pub s3_region: String,
    /// Custom endpoint for S3-compatible stores (MinIO etc.), empty for AWS
    pub s3_endpoint: String,
    /// Public URL prefix objects are served from when using s3
    pub s3_public_url: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: "local".to_string(),
            local_path: "./uploads".to_string(),
            s3_bucket: String::new(),
            s3_region: "us-east-1".to_string(),
            s3_endpoint: String::new(),
            s3_public_url: String::new(),
        }
    }
}

/// Content limits configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Default page size for listings
    pub per_page: u64,
    /// Maximum upload size in MB
    pub max_upload_size_mb: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            per_page: 20,
            max_upload_size_mb: 10,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub site: SiteConfig,
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub limits: LimitsConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::with_name("config").required(false))
            .add_source(Environment::with_prefix("HERBARIUM").separator("__"))
            .build()?
            .try_deserialize()
    }
}
