//! # Ausmass Infrastructure
//!
//! Infrastructure implementations of core domain ports.
//!
//! This crate contains:
//! - HTTP client wrapper with retry/timeout support
//! - Bexio integration (tax catalog, contacts, quote submission)
//! - PostgREST persistence adapter
//! - Configuration loading
//!
//! ## Architecture
//! - Implements traits defined in `ausmass-core`
//! - Depends on `ausmass-domain` and `ausmass-core`
//! - Contains all "impure" code (I/O, external services)

pub mod config;
pub mod errors;
pub mod http;
pub mod integrations;
pub mod persistence;

// Re-export commonly used items
pub use http::HttpClient;
pub use integrations::bexio::BexioClient;
pub use persistence::PostgrestRepository;
