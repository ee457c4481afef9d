//! POST /api/sync-to-bexio
//!
//! Triggers the one-way export of a project's measurements into a new Bexio
//! quote. Partial delivery failure still answers 200 with per-position
//! diagnostics; only missing/invalid ids, unknown projects, upstream auth
//! failures, and quote-creation errors map to error statuses.

use ausmass_domain::{AusmassError, SyncReport};
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncRequest {
    #[serde(default)]
    pub project_id: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncResponse {
    pub success: bool,
    pub message: String,
    #[serde(flatten)]
    pub report: SyncReport,
}

pub async fn sync_to_bexio(
    State(state): State<AppState>,
    Json(request): Json<SyncRequest>,
) -> Result<Json<SyncResponse>, ApiError> {
    let raw = request.project_id.unwrap_or_default();
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(AusmassError::InvalidInput("projectId is required".to_string()).into());
    }
    let project_id = Uuid::parse_str(raw)
        .map_err(|_| AusmassError::InvalidInput(format!("projectId is not a valid id: {raw}")))?;

    let report = state.sync.synchronize_project(project_id).await?;

    Ok(Json(SyncResponse {
        success: true,
        message: "Offerte erfolgreich zu Bexio übertragen".to_string(),
        report,
    }))
}
