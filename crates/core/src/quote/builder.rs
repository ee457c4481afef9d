//! Position builder
//!
//! Walks a project's rooms in sort order and produces the ordered position
//! list: a bold/underlined text header per populated room, then one priced
//! position per measurement, grouped by category in first-appearance order.
//! Rooms without measurements contribute nothing, not even their header.

use std::collections::HashMap;
use std::sync::Arc;

use ausmass_domain::constants::DEFAULT_TAX_RATE;
use ausmass_domain::{CategorySetting, Measurement, Project, QuotePosition, Result};
use tracing::debug;

use crate::quote::text::{self, MarkupRenderer};
use crate::quote::units::map_unit_name;
use crate::sync::ports::ProjectRepository;

/// Builds quote positions from a project's measurement data.
pub struct PositionBuilder {
    store: Arc<dyn ProjectRepository>,
    renderer: Arc<dyn MarkupRenderer>,
}

impl PositionBuilder {
    pub fn new(store: Arc<dyn ProjectRepository>, renderer: Arc<dyn MarkupRenderer>) -> Self {
        Self { store, renderer }
    }

    /// Build the full position list for one project.
    pub async fn build(&self, project: &Project) -> Result<Vec<QuotePosition>> {
        let rooms = self.store.list_rooms(project.id).await?;
        let settings = self.store.list_active_category_settings(project.scope).await?;
        let settings_by_category: HashMap<&str, &CategorySetting> =
            settings.iter().map(|setting| (setting.category.as_str(), setting)).collect();

        let mut positions = Vec::new();
        for room in &rooms {
            let measurements = self.store.list_measurements(room.id).await?;
            if measurements.is_empty() {
                continue;
            }

            positions.push(QuotePosition::Text { text: self.renderer.bold_underline(&room.name) });

            for (category, items) in group_by_category(&measurements) {
                let setting = settings_by_category.get(category).copied();
                for measurement in items {
                    positions.push(self.custom_position(measurement, setting));
                }
            }
        }

        debug!(
            project_id = %project.id,
            positions = positions.len(),
            "assembled quote positions"
        );
        Ok(positions)
    }

    fn custom_position(
        &self,
        measurement: &Measurement,
        setting: Option<&CategorySetting>,
    ) -> QuotePosition {
        let title = setting
            .map(|s| s.offer_title.trim())
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| measurement.category.trim());

        let mut paragraphs = Vec::new();
        if let Some(description) = setting.and_then(|s| s.offer_description.as_deref()) {
            let trimmed = description.trim();
            if !trimmed.is_empty() {
                paragraphs.push(trimmed.to_string());
            }
        }
        if let Some(description) = measurement.description.as_deref() {
            let trimmed = description.trim();
            if !trimmed.is_empty() {
                paragraphs.push(trimmed.to_string());
            }
        }
        if let Some(notes) = measurement.notes.as_deref() {
            let trimmed = notes.trim();
            if !trimmed.is_empty() {
                paragraphs.push(format!("{}{}", ausmass_domain::constants::NOTE_PREFIX, trimmed));
            }
        }

        let lines = text::normalize_paragraphs(&paragraphs);
        let body = text::render_position_text(self.renderer.as_ref(), title, &lines);

        let amount = if measurement.quantity == 0.0 { 1.0 } else { measurement.quantity };

        QuotePosition::Custom {
            text: body,
            amount,
            unit_price: setting.map(|s| s.unit_price).unwrap_or(0.0),
            unit_name: map_unit_name(measurement.unit).to_string(),
            tax_rate: setting.map(|s| s.tax_rate).unwrap_or(DEFAULT_TAX_RATE),
        }
    }
}

/// Group measurements by category, keyed in first-appearance order.
fn group_by_category(measurements: &[Measurement]) -> Vec<(&str, Vec<&Measurement>)> {
    let mut groups: Vec<(&str, Vec<&Measurement>)> = Vec::new();
    for measurement in measurements {
        let category = measurement.category.as_str();
        match groups.iter_mut().find(|(key, _)| *key == category) {
            Some((_, items)) => items.push(measurement),
            None => groups.push((category, vec![measurement])),
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    use ausmass_domain::MeasurementUnit;
    use uuid::Uuid;

    use super::*;

    fn measurement(category: &str, quantity: f64) -> Measurement {
        Measurement {
            id: Uuid::new_v4(),
            room_id: Uuid::new_v4(),
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

    #[test]
    fn grouping_preserves_first_appearance_order() {
        let items = vec![
            measurement("decke", 4.0),
            measurement("wand", 12.0),
            measurement("decke", 6.0),
        ];

        let groups = group_by_category(&items);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].0, "decke");
        assert_eq!(groups[0].1.len(), 2);
        assert_eq!(groups[1].0, "wand");
    }
}
