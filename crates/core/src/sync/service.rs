//! Synchronization service - exports one project into one external quote

use std::sync::Arc;

use ausmass_domain::constants::QUOTE_TITLE_PREFIX;
use ausmass_domain::{AusmassError, PositionFailure, Result, SyncReport};
use tracing::{info, warn};
use uuid::Uuid;

use crate::quote::builder::PositionBuilder;
use crate::quote::text::MarkupRenderer;
use crate::sync::ports::{ProjectRepository, QuotingPlatform, SubmitError};

/// One-way, on-demand export of a project's measurements into a quote.
///
/// Every call is independent and stateless: all data is re-fetched, a new
/// quote is created, and nothing about the transfer is persisted beyond the
/// returned report. Positions are submitted strictly sequentially so the
/// room-header/item ordering survives on the platform side.
pub struct SyncService {
    store: Arc<dyn ProjectRepository>,
    platform: Arc<dyn QuotingPlatform>,
    builder: PositionBuilder,
}

impl SyncService {
    pub fn new(
        store: Arc<dyn ProjectRepository>,
        platform: Arc<dyn QuotingPlatform>,
        renderer: Arc<dyn MarkupRenderer>,
    ) -> Self {
        let builder = PositionBuilder::new(store.clone(), renderer);
        Self { store, platform, builder }
    }

    /// Export the given project. Partial delivery failure is reported in the
    /// returned counts; only input, not-found, authorization, and
    /// quote-creation failures surface as errors.
    pub async fn synchronize_project(&self, project_id: Uuid) -> Result<SyncReport> {
        let project = self
            .store
            .get_project(project_id)
            .await?
            .ok_or_else(|| AusmassError::NotFound(format!("project {project_id} not found")))?;

        let positions = self.builder.build(&project).await?;

        let contact_id = self
            .platform
            .resolve_contact(&project.customer_name, project.address.as_deref())
            .await?;
        if contact_id.is_none() {
            warn!(project_id = %project.id, "no contact resolved; quote will have no contact reference");
        }

        let title = format!("{QUOTE_TITLE_PREFIX}{}", project.customer_name);
        let quote = self.platform.create_quote(&title, contact_id).await?;
        info!(quote_id = quote.id, positions = positions.len(), "quote header created");

        let taxes = self.platform.tax_catalog().await;

        let mut success_count = 0;
        let mut fail_count = 0;
        let mut errors = Vec::new();

        for (i, position) in positions.iter().enumerate() {
            match self.platform.post_position(quote.id, position, &taxes).await {
                Ok(()) => success_count += 1,
                Err(SubmitError::Unauthorized { endpoint }) => {
                    return Err(AusmassError::Auth(format!(
                        "token rejected while posting position {} to {endpoint}",
                        i + 1
                    )));
                }
                Err(SubmitError::Fatal(err)) => return Err(err),
                Err(SubmitError::Rejected { endpoint, status, payload, body }) => {
                    warn!(index = i + 1, %endpoint, status, "position rejected");
                    fail_count += 1;
                    errors.push(PositionFailure {
                        index: i + 1,
                        endpoint,
                        payload,
                        error: body,
                        status,
                    });
                }
            }
        }

        info!(
            quote_id = quote.id,
            success_count, fail_count, "synchronization finished"
        );

        Ok(SyncReport {
            quote_id: quote.id,
            quote_number: quote.document_nr,
            success_count,
            fail_count,
            positions_count: positions.len(),
            errors,
        })
    }
}
