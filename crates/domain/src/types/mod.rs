//! Domain types and models

pub mod project;
pub mod quote;

pub use project::{
    CategorySetting, Measurement, MeasurementUnit, Project, ProjectStatus, Room, Scope,
};
pub use quote::{PositionFailure, QuoteHeader, QuotePosition, SyncReport};
