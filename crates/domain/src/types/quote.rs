//! Quote export types
//!
//! Positions exist only for the duration of one export call; nothing here is
//! persisted locally. The report serializes with the camelCase keys the
//! calling UI expects.

use serde::{Deserialize, Serialize};

/// One line item destined for the external quote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QuotePosition {
    /// Plain text line (room header)
    Text { text: String },
    /// Priced custom line
    Custom { text: String, amount: f64, unit_price: f64, unit_name: String, tax_rate: f64 },
}

impl QuotePosition {
    /// The composed rich-text body of the position.
    pub fn text(&self) -> &str {
        match self {
            Self::Text { text } | Self::Custom { text, .. } => text,
        }
    }
}

/// Quote header as created on the external platform
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct QuoteHeader {
    pub id: i64,
    #[serde(default)]
    pub document_nr: Option<String>,
}

/// Diagnostic record for a position that could not be delivered
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PositionFailure {
    /// 1-based position index within the export
    pub index: usize,
    /// Last endpoint tried
    pub endpoint: String,
    /// Payload excerpt (long texts truncated)
    pub payload: serde_json::Value,
    /// Raw error body from the platform
    pub error: String,
    /// HTTP status of the last attempt
    pub status: u16,
}

/// Aggregated outcome of one export call.
///
/// Partial failure is data, not an error: the caller always receives counts
/// plus per-position diagnostics.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncReport {
    pub quote_id: i64,
    pub quote_number: Option<String>,
    pub success_count: usize,
    pub fail_count: usize,
    pub positions_count: usize,
    pub errors: Vec<PositionFailure>,
}
