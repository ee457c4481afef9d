//! Mapping between captured measurement units and Bexio unit names

use ausmass_domain::constants::DEFAULT_UNIT_NAME;
use ausmass_domain::MeasurementUnit;

/// Map a captured unit onto the quoting platform's unit vocabulary.
///
/// Total over all inputs: absent and unknown units map to the default
/// piece unit.
pub fn map_unit_name(unit: Option<MeasurementUnit>) -> &'static str {
    match unit {
        Some(MeasurementUnit::Area) => "m2",
        Some(MeasurementUnit::Linear) => "m",
        Some(MeasurementUnit::Count) | Some(MeasurementUnit::LumpSum) => DEFAULT_UNIT_NAME,
        Some(MeasurementUnit::Unknown) | None => DEFAULT_UNIT_NAME,
    }
}

/// Alternate spellings the platform has been observed to accept for a unit
/// family, tried in order when a post is rejected over `unit_name`.
pub fn unit_name_alternates(unit_name: &str) -> &'static [&'static str] {
    match unit_name.to_ascii_lowercase().as_str() {
        "m2" => &["m2", "m²", "qm"],
        "m" => &["m", "lfm"],
        _ => &["Stk", "stk"],
    }
}
