//! # Ausmass Core
//!
//! Pure business logic layer - no infrastructure dependencies.
//!
//! This crate contains:
//! - Quote position building and text composition
//! - Unit mapping and tax catalog lookup
//! - Port/adapter interfaces (traits)
//! - The synchronization service
//!
//! ## Architecture Principles
//! - Only depends on `ausmass-domain`
//! - No database, HTTP, or platform code
//! - All external dependencies via traits
//! - Pure, testable business logic

pub mod quote;
pub mod sync;

// Re-export specific items to avoid ambiguity
pub use quote::builder::PositionBuilder;
pub use quote::taxes::TaxCatalog;
pub use quote::text::{normalize_paragraphs, HtmlRenderer, Line, LineKind, MarkupRenderer};
pub use quote::units::{map_unit_name, unit_name_alternates};
pub use sync::ports::{ProjectRepository, QuotingPlatform, SubmitError};
pub use sync::SyncService;
