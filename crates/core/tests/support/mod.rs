//! Shared in-memory port implementations for core service tests

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use ausmass_core::{ProjectRepository, QuotingPlatform, SubmitError, TaxCatalog};
use ausmass_domain::{
    AusmassError, CategorySetting, Measurement, MeasurementUnit, Project, ProjectStatus,
    QuoteHeader, QuotePosition, Result, Room, Scope,
};
use uuid::Uuid;

/// Fixture store that mimics the hosted data store's ordering guarantees.
#[derive(Default)]
pub struct InMemoryStore {
    pub projects: Vec<Project>,
    pub rooms: Vec<Room>,
    pub measurements: HashMap<Uuid, Vec<Measurement>>,
    pub settings: Vec<CategorySetting>,
}

#[async_trait]
impl ProjectRepository for InMemoryStore {
    async fn get_project(&self, id: Uuid) -> Result<Option<Project>> {
        Ok(self.projects.iter().find(|p| p.id == id).cloned())
    }

    async fn list_rooms(&self, project_id: Uuid) -> Result<Vec<Room>> {
        let mut rooms: Vec<Room> =
            self.rooms.iter().filter(|r| r.project_id == project_id).cloned().collect();
        rooms.sort_by_key(|r| r.sort_order);
        Ok(rooms)
    }

    async fn list_measurements(&self, room_id: Uuid) -> Result<Vec<Measurement>> {
        let mut measurements = self.measurements.get(&room_id).cloned().unwrap_or_default();
        measurements.sort_by(|a, b| a.category.cmp(&b.category));
        Ok(measurements)
    }

    async fn list_active_category_settings(
        &self,
        scope: Option<Scope>,
    ) -> Result<Vec<CategorySetting>> {
        Ok(self
            .settings
            .iter()
            .filter(|s| s.is_active)
            .filter(|s| scope.is_none() || s.scope.is_none() || s.scope == scope)
            .cloned()
            .collect())
    }
}

/// How the scripted platform reacts to contact resolution.
pub enum ContactBehavior {
    Found(i64),
    Degraded,
    Unauthorized,
}

/// Scripted quoting platform recording everything posted to it.
pub struct ScriptedPlatform {
    pub taxes: TaxCatalog,
    pub contact: ContactBehavior,
    pub quote: QuoteHeader,
    pub quote_created: AtomicBool,
    pub posted: Mutex<Vec<QuotePosition>>,
    /// 0-based indices of positions to reject
    pub reject_indices: Vec<usize>,
}

impl ScriptedPlatform {
    pub fn new(taxes: TaxCatalog) -> Self {
        Self {
            taxes,
            contact: ContactBehavior::Found(7),
            quote: QuoteHeader { id: 4242, document_nr: Some("AN-0001".to_string()) },
            quote_created: AtomicBool::new(false),
            posted: Mutex::new(Vec::new()),
            reject_indices: Vec::new(),
        }
    }
}

#[async_trait]
impl QuotingPlatform for ScriptedPlatform {
    async fn tax_catalog(&self) -> TaxCatalog {
        self.taxes.clone()
    }

    async fn resolve_contact(&self, _name: &str, _address: Option<&str>) -> Result<Option<i64>> {
        match &self.contact {
            ContactBehavior::Found(id) => Ok(Some(*id)),
            ContactBehavior::Degraded => Ok(None),
            ContactBehavior::Unauthorized => {
                Err(AusmassError::Auth("token rejected by contact search".to_string()))
            }
        }
    }

    async fn create_quote(&self, _title: &str, _contact_id: Option<i64>) -> Result<QuoteHeader> {
        self.quote_created.store(true, Ordering::SeqCst);
        Ok(self.quote.clone())
    }

    async fn post_position(
        &self,
        _quote_id: i64,
        position: &QuotePosition,
        _taxes: &TaxCatalog,
    ) -> std::result::Result<(), SubmitError> {
        let mut posted = self.posted.lock().expect("posted mutex poisoned");
        let index = posted.len();
        posted.push(position.clone());
        if self.reject_indices.contains(&index) {
            return Err(SubmitError::Rejected {
                endpoint: "https://api.example/kb_position_custom".to_string(),
                status: 422,
                payload: serde_json::json!({"text": position.text()}),
                body: "scripted rejection".to_string(),
            });
        }
        Ok(())
    }
}

pub fn project(scope: Option<Scope>) -> Project {
    Project {
        id: Uuid::new_v4(),
        customer_name: "Muster AG".to_string(),
        address: Some("Dorfstrasse 1, 8000 Zürich".to_string()),
        status: ProjectStatus::Offered,
        scope,
        appointment_date: None,
        notes: None,
        bexio_sent: false,
    }
}

pub fn room(project_id: Uuid, name: &str, sort_order: i32) -> Room {
    Room { id: Uuid::new_v4(), project_id, name: name.to_string(), sort_order }
}

pub fn measurement(room_id: Uuid, category: &str, quantity: f64) -> Measurement {
    Measurement {
        id: Uuid::new_v4(),
        room_id,
        category: category.to_string(),
        description: None,
        unit: Some(MeasurementUnit::Area),
        quantity,
        length: None,
        width: None,
        height: None,
        notes: None,
    }
}

pub fn setting(category: &str, title: &str, price: f64, tax_rate: f64) -> CategorySetting {
    CategorySetting {
        id: Uuid::new_v4(),
        category: category.to_string(),
        offer_title: title.to_string(),
        offer_description: None,
        tax_rate,
        unit_price: price,
        is_active: true,
        scope: None,
    }
}
