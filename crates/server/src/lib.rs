//! # Ausmass Server
//!
//! HTTP surface for the Ausmass→Bexio export service. One operation does the
//! work (`POST /api/sync-to-bexio`); everything else is plumbing around it.

pub mod error;
pub mod routes;
pub mod state;

use axum::routing::{get, post};
use axum::Router;

pub use state::AppState;

/// Assemble the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(routes::health::health))
        .route("/api/sync-to-bexio", post(routes::sync::sync_to_bexio))
        .with_state(state)
}
