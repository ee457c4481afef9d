//! Application configuration structures
//!
//! Configuration is assembled once at process start (see the loader in the
//! infra crate) and passed into adapters by value. Adapters never read
//! process-wide globals; fallback tax identifiers and both Bexio base URLs
//! live here so an operator can override them without a rebuild.

use serde::{Deserialize, Serialize};

/// Top-level application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub bexio: BexioConfig,
    pub store: StoreConfig,
}

/// HTTP server binding
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "127.0.0.1".to_string(), port: 8787 }
    }
}

/// Bexio API connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BexioConfig {
    /// Base URL of the current API generation
    pub base_url: String,
    /// Base URL of the prior API generation, still accepted for some
    /// line-item endpoints
    pub legacy_base_url: String,
    /// Bearer token, read from server-side configuration only
    pub api_token: String,
    /// Tax identifier used when the remote catalog cannot be fetched
    /// (standard rate)
    pub fallback_tax_id: i64,
    /// Tax identifier used when the remote catalog cannot be fetched
    /// (zero rate)
    pub fallback_zero_tax_id: i64,
    /// Timeout for outbound requests, in seconds
    pub timeout_secs: u64,
}

impl Default for BexioConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.bexio.com/3.0".to_string(),
            legacy_base_url: "https://api.bexio.com/2.0".to_string(),
            api_token: String::new(),
            fallback_tax_id: 383,
            fallback_zero_tax_id: 2,
            timeout_secs: 30,
        }
    }
}

/// Persistence service (PostgREST) connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Base URL of the hosted data store (without the `/rest/v1` suffix)
    pub base_url: String,
    /// Service-role key used for both the `apikey` header and bearer auth
    pub service_role_key: String,
    /// Timeout for store requests, in seconds
    pub timeout_secs: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self { base_url: String::new(), service_role_key: String::new(), timeout_secs: 30 }
    }
}
