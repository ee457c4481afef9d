//! PostgREST-backed implementation of the `ProjectRepository` port
//!
//! The hosted store exposes its tables through a PostgREST layer under
//! `/rest/v1`. Queries use `eq.`/`order=` parameters; authentication is the
//! service-role key sent both as `apikey` and bearer token, so the calling
//! client never sees it.

use std::time::Duration;

use async_trait::async_trait;
use ausmass_core::ProjectRepository;
use ausmass_domain::{
    AusmassError, CategorySetting, Measurement, Project, Result, Room, Scope, StoreConfig,
};
use reqwest::Method;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::http::HttpClient;

/// Read-only REST client for projects, rooms, measurements, and the pricing
/// catalog.
pub struct PostgrestRepository {
    http: HttpClient,
    config: StoreConfig,
}

impl PostgrestRepository {
    pub fn new(config: StoreConfig) -> Result<Self> {
        let http =
            HttpClient::builder().timeout(Duration::from_secs(config.timeout_secs)).build()?;
        Ok(Self { http, config })
    }

    async fn fetch<T: DeserializeOwned>(&self, path_and_query: &str) -> Result<Vec<T>> {
        let url = format!("{}/rest/v1/{}", self.config.base_url, path_and_query);
        debug!(%url, "querying store");

        let builder = self
            .http
            .request(Method::GET, &url)
            .header("apikey", &self.config.service_role_key)
            .header("Authorization", format!("Bearer {}", self.config.service_role_key))
            .header("Accept", "application/json");

        let response = self.http.send(builder).await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AusmassError::Store(format!(
                "store query failed (HTTP {}): {}",
                status.as_u16(),
                body
            )));
        }

        response
            .json()
            .await
            .map_err(|err| AusmassError::Internal(format!("failed to parse store response: {err}")))
    }
}

/// PostgREST reports a filter on a non-existent column as SQLSTATE 42703.
fn is_missing_column(err: &AusmassError) -> bool {
    match err {
        AusmassError::Store(message) => {
            message.contains("42703") || message.to_lowercase().contains("column")
        }
        _ => false,
    }
}

#[async_trait]
impl ProjectRepository for PostgrestRepository {
    async fn get_project(&self, id: Uuid) -> Result<Option<Project>> {
        let projects: Vec<Project> =
            self.fetch(&format!("projects?select=*&id=eq.{id}&limit=1")).await?;
        Ok(projects.into_iter().next())
    }

    async fn list_rooms(&self, project_id: Uuid) -> Result<Vec<Room>> {
        self.fetch(&format!("rooms?select=*&project_id=eq.{project_id}&order=sort_order.asc"))
            .await
    }

    async fn list_measurements(&self, room_id: Uuid) -> Result<Vec<Measurement>> {
        self.fetch(&format!("measurements?select=*&room_id=eq.{room_id}&order=category.asc")).await
    }

    async fn list_active_category_settings(
        &self,
        scope: Option<Scope>,
    ) -> Result<Vec<CategorySetting>> {
        if let Some(scope) = scope {
            let scoped_query = format!(
                "category_settings?select=*&is_active=eq.true&scope=eq.{}",
                scope.as_db_str()
            );
            match self.fetch(&scoped_query).await {
                Ok(settings) => return Ok(settings),
                // Older store deployments predate the scope column; fall
                // back to the unfiltered catalog for those only.
                Err(err) if is_missing_column(&err) => {
                    warn!(error = %err, "scope column unavailable; using unfiltered catalog");
                }
                Err(err) => return Err(err),
            }
        }

        self.fetch("category_settings?select=*&is_active=eq.true").await
    }
}
