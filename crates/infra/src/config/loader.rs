//! Configuration loader
//!
//! Loads application configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If incomplete, falls back to loading from file
//! 3. Probes multiple paths for config files
//! 4. Supports JSON and TOML formats
//!
//! ## Environment Variables
//! - `SUPABASE_URL`: Base URL of the hosted data store
//! - `SUPABASE_SERVICE_ROLE_KEY` (or legacy `SERVICE_ROLE_KEY`): store
//!   service-role key
//! - `BEXIO_API_TOKEN`: Bexio bearer token
//! - `BEXIO_BASE_URL` / `BEXIO_LEGACY_BASE_URL`: API base URLs (optional)
//! - `BEXIO_FALLBACK_TAX_ID` / `BEXIO_FALLBACK_ZERO_TAX_ID`: tax ids used
//!   when the remote catalog cannot be fetched (optional)
//! - `AUSMASS_SERVER_HOST` / `AUSMASS_SERVER_PORT`: HTTP bind (optional)
//!
//! ## File Locations
//! The loader probes `config.{json,toml}` and `ausmass.{json,toml}` in the
//! working directory, up to two parent directories, and next to the
//! executable.

use std::path::{Path, PathBuf};

use ausmass_domain::{AppConfig, AusmassError, Result};

/// Load configuration with automatic fallback strategy
///
/// First attempts to load from environment variables. If any required
/// variables are missing, falls back to loading from a config file.
///
/// # Errors
/// Returns `AusmassError::Config` if:
/// - Configuration cannot be loaded from either source
/// - File format is invalid
/// - Required fields are missing
pub fn load() -> Result<AppConfig> {
    match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = ?e, "Failed to load from environment, trying file");
            load_from_file(None)
        }
    }
}

/// Load configuration from environment variables
///
/// The store URL, service-role key, and Bexio token are required; every
/// other setting falls back to its default.
///
/// # Errors
/// Returns `AusmassError::Config` if required variables are missing or have
/// invalid values.
pub fn load_from_env() -> Result<AppConfig> {
    let mut config = AppConfig::default();

    config.store.base_url = env_var("SUPABASE_URL")?;
    config.store.service_role_key = std::env::var("SUPABASE_SERVICE_ROLE_KEY")
        .or_else(|_| std::env::var("SERVICE_ROLE_KEY"))
        .map_err(|_| {
            AusmassError::Config(
                "Missing required environment variable: SUPABASE_SERVICE_ROLE_KEY".to_string(),
            )
        })?;
    config.bexio.api_token = env_var("BEXIO_API_TOKEN")?;

    if let Ok(base_url) = std::env::var("BEXIO_BASE_URL") {
        config.bexio.base_url = base_url;
    }
    if let Ok(legacy_base_url) = std::env::var("BEXIO_LEGACY_BASE_URL") {
        config.bexio.legacy_base_url = legacy_base_url;
    }
    if let Some(id) = env_parse::<i64>("BEXIO_FALLBACK_TAX_ID")? {
        config.bexio.fallback_tax_id = id;
    }
    if let Some(id) = env_parse::<i64>("BEXIO_FALLBACK_ZERO_TAX_ID")? {
        config.bexio.fallback_zero_tax_id = id;
    }
    if let Ok(host) = std::env::var("AUSMASS_SERVER_HOST") {
        config.server.host = host;
    }
    if let Some(port) = env_parse::<u16>("AUSMASS_SERVER_PORT")? {
        config.server.port = port;
    }

    Ok(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Errors
/// Returns `AusmassError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
pub fn load_from_file(path: Option<PathBuf>) -> Result<AppConfig> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(AusmassError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            AusmassError::Config(
                "No config file found in any of the standard locations".to_string(),
            )
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| AusmassError::Config(format!("Failed to read config file: {}", e)))?;

    parse_config(&contents, &config_path)
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
fn parse_config(contents: &str, path: &Path) -> Result<AppConfig> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| AusmassError::Config(format!("Invalid TOML format: {}", e))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| AusmassError::Config(format!("Invalid JSON format: {}", e))),
        _ => Err(AusmassError::Config(format!("Unsupported config format: {}", extension))),
    }
}

/// Probe multiple paths for configuration files
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let file_names =
        ["config.json", "config.toml", "ausmass.json", "ausmass.toml"];
    let mut candidates = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        for prefix in ["", "..", "../.."] {
            let dir = if prefix.is_empty() { cwd.clone() } else { cwd.join(prefix) };
            candidates.extend(file_names.iter().map(|name| dir.join(name)));
        }
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            candidates.extend(file_names.iter().map(|name| exe_dir.join(name)));
        }
    }

    candidates.into_iter().find(|path| path.exists())
}

/// Get required environment variable
fn env_var(key: &str) -> Result<String> {
    std::env::var(key).map_err(|_| {
        AusmassError::Config(format!("Missing required environment variable: {}", key))
    })
}

/// Parse an optional environment variable, erroring only on bad values.
fn env_parse<T: std::str::FromStr>(key: &str) -> Result<Option<T>> {
    match std::env::var(key) {
        Ok(raw) => raw.parse::<T>().map(Some).map_err(|_| {
            AusmassError::Config(format!("Invalid value for {}: {}", key, raw))
        }),
        Err(_) => Ok(None),
    }
}
