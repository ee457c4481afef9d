//! Project, room, measurement, and catalog types
//!
//! Field names and enum vocabulary mirror the hosted data store's columns,
//! so these types deserialize straight from its REST responses.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::utils::numeric::{lenient_f64, lenient_opt_f64};

/// Project lifecycle status, stored under its German column values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectStatus {
    #[serde(rename = "offeriert")]
    Offered,
    #[serde(rename = "ausfuehrung")]
    InExecution,
    #[serde(rename = "abgeschlossen")]
    Completed,
}

/// Scope tag distinguishing interior from exterior work.
///
/// Stored as `innen` / `aussen`; the pricing catalog is partitioned on this
/// tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Scope {
    #[serde(rename = "innen")]
    Interior,
    #[serde(rename = "aussen")]
    Exterior,
}

impl Scope {
    /// The store's column value for this scope.
    pub fn as_db_str(self) -> &'static str {
        match self {
            Self::Interior => "innen",
            Self::Exterior => "aussen",
        }
    }
}

/// A customer project
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: Uuid,
    pub customer_name: String,
    #[serde(default)]
    pub address: Option<String>,
    pub status: ProjectStatus,
    #[serde(default)]
    pub scope: Option<Scope>,
    #[serde(default)]
    pub appointment_date: Option<NaiveDate>,
    #[serde(default)]
    pub notes: Option<String>,
    /// Set by the UI after a successful export; informational only, the
    /// exporter does not consult it.
    #[serde(default)]
    pub bexio_sent: bool,
}

/// A room within a project
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Room {
    pub id: Uuid,
    pub project_id: Uuid,
    pub name: String,
    #[serde(default)]
    pub sort_order: i32,
}

/// Measurement unit as captured in the field.
///
/// The store column is an open string; unknown values deserialize to
/// [`MeasurementUnit::Unknown`] and export with the default unit name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MeasurementUnit {
    #[serde(rename = "m2", alias = "m²")]
    Area,
    #[serde(rename = "lfm")]
    Linear,
    #[serde(rename = "stk")]
    Count,
    #[serde(rename = "pauschal")]
    LumpSum,
    #[serde(other)]
    Unknown,
}

/// One itemized measurement line
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Measurement {
    pub id: Uuid,
    pub room_id: Uuid,
    pub category: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub unit: Option<MeasurementUnit>,
    /// Pre-computed by the capturing UI; exported verbatim.
    #[serde(default, deserialize_with = "lenient_f64")]
    pub quantity: f64,
    #[serde(default, deserialize_with = "lenient_opt_f64")]
    pub length: Option<f64>,
    #[serde(default, deserialize_with = "lenient_opt_f64")]
    pub width: Option<f64>,
    #[serde(default, deserialize_with = "lenient_opt_f64")]
    pub height: Option<f64>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Pricing/text catalog entry for a measurement category
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategorySetting {
    pub id: Uuid,
    pub category: String,
    pub offer_title: String,
    #[serde(default)]
    pub offer_description: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub tax_rate: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub unit_price: f64,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub scope: Option<Scope>,
}
