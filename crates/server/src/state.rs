//! Shared application state

use std::sync::Arc;

use ausmass_core::SyncService;

/// State handed to every request handler.
#[derive(Clone)]
pub struct AppState {
    pub sync: Arc<SyncService>,
}
