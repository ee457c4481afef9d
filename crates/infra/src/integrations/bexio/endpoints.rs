//! Candidate endpoint descriptors for position delivery
//!
//! Each position is posted against an ordered plan of (API generation, path
//! convention, payload shape) combinations until one succeeds. The plans are
//! plain data so a newly observed upstream quirk becomes one more table row.

use ausmass_domain::{BexioConfig, QuotePosition};
use serde_json::{json, Value};

/// Bexio API generation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Generation {
    /// Current generation (`/3.0`)
    Current,
    /// Prior generation (`/2.0`), still accepted for nested line-item posts
    Legacy,
}

/// Path convention for line-item endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathStyle {
    /// Resource at the API root, quote referenced via `kb_document_id`
    Root,
    /// Resource nested under the quote document
    Nested,
}

/// Payload reduction applied for a candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadShape {
    /// The full base payload including document id, unit, and tax fields
    Full,
    /// Text field only (nested text positions carry nothing else)
    TextOnly,
    /// Text, amount, price, and discount; the server fills unit and tax
    /// defaults
    Reduced,
}

/// One row of a delivery plan
#[derive(Debug, Clone, Copy)]
pub struct CandidateSpec {
    pub generation: Generation,
    pub path: PathStyle,
    pub shape: PayloadShape,
}

/// Delivery order for text positions: the root endpoint accepts the full
/// payload, the nested variants only the text.
pub const TEXT_PLAN: [CandidateSpec; 3] = [
    CandidateSpec { generation: Generation::Current, path: PathStyle::Root, shape: PayloadShape::Full },
    CandidateSpec {
        generation: Generation::Current,
        path: PathStyle::Nested,
        shape: PayloadShape::TextOnly,
    },
    CandidateSpec {
        generation: Generation::Legacy,
        path: PathStyle::Nested,
        shape: PayloadShape::TextOnly,
    },
];

/// Delivery order for priced positions: nested endpoints reject unit/tax
/// fields, so the reduced shape goes first and the full root payload is the
/// last resort.
pub const CUSTOM_PLAN: [CandidateSpec; 3] = [
    CandidateSpec {
        generation: Generation::Legacy,
        path: PathStyle::Nested,
        shape: PayloadShape::Reduced,
    },
    CandidateSpec {
        generation: Generation::Current,
        path: PathStyle::Nested,
        shape: PayloadShape::Reduced,
    },
    CandidateSpec { generation: Generation::Current, path: PathStyle::Root, shape: PayloadShape::Full },
];

/// A resolved candidate: concrete URL plus the payload to send.
#[derive(Debug, Clone)]
pub struct CandidateRequest {
    pub url: String,
    pub payload: Value,
}

/// Resolve the delivery plan for a position into concrete requests.
pub fn candidates_for(
    config: &BexioConfig,
    quote_id: i64,
    position: &QuotePosition,
    base_payload: &Value,
) -> Vec<CandidateRequest> {
    let (plan, resource): (&[CandidateSpec], &str) = match position {
        QuotePosition::Text { .. } => (&TEXT_PLAN, "kb_position_text"),
        QuotePosition::Custom { .. } => (&CUSTOM_PLAN, "kb_position_custom"),
    };

    plan.iter().map(|spec| resolve(spec, config, quote_id, resource, base_payload)).collect()
}

fn resolve(
    spec: &CandidateSpec,
    config: &BexioConfig,
    quote_id: i64,
    resource: &str,
    base_payload: &Value,
) -> CandidateRequest {
    let base_url = match spec.generation {
        Generation::Current => &config.base_url,
        Generation::Legacy => &config.legacy_base_url,
    };
    let url = match spec.path {
        PathStyle::Root => format!("{base_url}/{resource}"),
        PathStyle::Nested => format!("{base_url}/kb_offer/{quote_id}/{resource}"),
    };
    let payload = match spec.shape {
        PayloadShape::Full => base_payload.clone(),
        PayloadShape::TextOnly => json!({ "text": base_payload["text"] }),
        PayloadShape::Reduced => json!({
            "text": base_payload["text"],
            "amount": base_payload["amount"],
            "unit_price": base_payload["unit_price"],
            "discount_in_percent": base_payload["discount_in_percent"],
        }),
    };
    CandidateRequest { url, payload }
}
