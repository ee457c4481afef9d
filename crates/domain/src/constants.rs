//! Domain constants shared across crates

/// Tax rate applied when a measurement category has no active catalog entry.
pub const DEFAULT_TAX_RATE: f64 = 8.1;

/// Unit name sent to the quoting platform when no mapping applies.
pub const DEFAULT_UNIT_NAME: &str = "Stk";

/// Prefix for quote titles, followed by the customer name.
pub const QUOTE_TITLE_PREFIX: &str = "Ausmass - ";

/// Prefix placed before measurement notes in composed position text.
pub const NOTE_PREFIX: &str = "Hinweis: ";

/// Inline attribute token marking a paint color specification.
pub const COLOR_TOKEN: &str = "Farbton:";

/// Inline attribute token marking an application method specification.
pub const APPLICATION_TOKEN: &str = "Applikationsart:";
