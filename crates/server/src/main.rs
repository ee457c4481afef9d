//! Ausmass server binary

use std::sync::Arc;

use ausmass_core::{HtmlRenderer, MarkupRenderer, ProjectRepository, QuotingPlatform, SyncService};
use ausmass_infra::{BexioClient, PostgrestRepository};
use ausmass_server::{router, AppState};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = ausmass_infra::config::load()?;

    let store: Arc<dyn ProjectRepository> =
        Arc::new(PostgrestRepository::new(config.store.clone())?);
    let platform: Arc<dyn QuotingPlatform> = Arc::new(BexioClient::new(config.bexio.clone())?);
    let renderer: Arc<dyn MarkupRenderer> = Arc::new(HtmlRenderer);
    let sync = Arc::new(SyncService::new(store, platform, renderer));

    let app = router(AppState { sync });

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(%addr, "ausmass server listening");

    axum::serve(listener, app).await?;
    Ok(())
}
