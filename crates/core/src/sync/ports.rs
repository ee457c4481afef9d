//! Port interfaces for quote synchronization

use async_trait::async_trait;
use ausmass_domain::{
    CategorySetting, Measurement, Project, QuoteHeader, QuotePosition, Result, Room, Scope,
};
use thiserror::Error;
use uuid::Uuid;

use crate::quote::taxes::TaxCatalog;

/// Read access to the hosted project store.
#[async_trait]
pub trait ProjectRepository: Send + Sync {
    /// Load one project by id
    async fn get_project(&self, id: Uuid) -> Result<Option<Project>>;

    /// Rooms of a project, ascending by sort order
    async fn list_rooms(&self, project_id: Uuid) -> Result<Vec<Room>>;

    /// Measurements of a room, ascending by category key
    async fn list_measurements(&self, room_id: Uuid) -> Result<Vec<Measurement>>;

    /// Active pricing catalog entries, filtered by scope when the store
    /// supports it
    async fn list_active_category_settings(
        &self,
        scope: Option<Scope>,
    ) -> Result<Vec<CategorySetting>>;
}

/// Outcome of a single position delivery attempt that did not succeed.
#[derive(Debug, Error)]
pub enum SubmitError {
    /// The platform rejected the bearer token; the whole export must abort.
    #[error("unauthorized at {endpoint}")]
    Unauthorized { endpoint: String },

    /// The position was rejected through every candidate endpoint and retry.
    #[error("position rejected by {endpoint} (HTTP {status})")]
    Rejected { endpoint: String, status: u16, payload: serde_json::Value, body: String },

    /// Transport-level failure; aborts the export like any other unexpected
    /// error.
    #[error(transparent)]
    Fatal(#[from] ausmass_domain::AusmassError),
}

/// Operations the external quoting platform exposes to the exporter.
#[async_trait]
pub trait QuotingPlatform: Send + Sync {
    /// Fetch the tax catalog. Best-effort: transport failures degrade to
    /// the configured fallback pairs, so the catalog is never empty.
    async fn tax_catalog(&self) -> TaxCatalog;

    /// Find a contact by name, creating one when absent.
    ///
    /// Returns `Ok(None)` when creation fails for non-auth reasons (the
    /// quote is then created without a contact reference). A 401 on either
    /// call is fatal and surfaces as `AusmassError::Auth`.
    async fn resolve_contact(&self, name: &str, address: Option<&str>) -> Result<Option<i64>>;

    /// Create the quote header the positions will be posted against.
    async fn create_quote(&self, title: &str, contact_id: Option<i64>) -> Result<QuoteHeader>;

    /// Deliver one position, probing candidate endpoints and applying the
    /// platform-specific retry ladders.
    async fn post_position(
        &self,
        quote_id: i64,
        position: &QuotePosition,
        taxes: &TaxCatalog,
    ) -> std::result::Result<(), SubmitError>;
}
