//! Results panel shown beside the map

use serde::Serialize;

use super::feature::{AttributeTable, FeatureCollection};

/// Message shown while nothing is selected
pub const SELECT_PROMPT: &str = "Use the tools to select a site on the map";

/// What the results panel displays for a selection
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ResultsPanel {
    /// No shape drawn, or the shape touches no building
    Prompt,
    /// Selected buildings and their attributes
    Selected { count: usize, table: AttributeTable },
}

impl ResultsPanel {
    /// Build the panel from the filter output.
    ///
    /// Without a drawn shape the filter returns the whole layer, which is
    /// not a selection, so the prompt is shown instead.
    pub fn from_selection(shape_drawn: bool, selection: &FeatureCollection) -> Self {
        if !shape_drawn || selection.is_empty() {
            return ResultsPanel::Prompt;
        }

        ResultsPanel::Selected {
            count: selection.len(),
            table: selection.attribute_table(),
        }
    }

    pub fn message(&self) -> String {
        match self {
            ResultsPanel::Prompt => SELECT_PROMPT.to_string(),
            ResultsPanel::Selected { count, .. } => format!("{} building selected.", count),
        }
    }

    pub fn table(&self) -> Option<&AttributeTable> {
        match self {
            ResultsPanel::Prompt => None,
            ResultsPanel::Selected { table, .. } => Some(table),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Crs, Feature, FeatureId, Geometry};
    use serde_json::json;

    fn layer(n: usize) -> FeatureCollection {
        let features = (0..n)
            .map(|i| {
                let properties = json!({ "bin": i }).as_object().cloned().unwrap_or_default();
                Feature::new(FeatureId(i), Geometry::point(i as f64, 0.0), properties)
            })
            .collect();
        FeatureCollection::new("blocks", Crs::wgs84(), features)
    }

    #[test]
    fn test_no_shape_shows_prompt() {
        let panel = ResultsPanel::from_selection(false, &layer(10));
        assert_eq!(panel, ResultsPanel::Prompt);
        assert_eq!(panel.message(), "Use the tools to select a site on the map");
        assert!(panel.table().is_none());
    }

    #[test]
    fn test_empty_selection_shows_prompt() {
        let panel = ResultsPanel::from_selection(true, &layer(0));
        assert_eq!(panel.message(), SELECT_PROMPT);
    }

    #[test]
    fn test_selection_shows_count_and_table() {
        let panel = ResultsPanel::from_selection(true, &layer(3));

        assert_eq!(panel.message(), "3 building selected.");
        let table = panel.table().unwrap();
        assert_eq!(table.columns, vec!["bin"]);
        assert_eq!(table.rows.len(), 3);
    }

    #[test]
    fn test_serialized_status_tag() {
        let json = serde_json::to_value(ResultsPanel::from_selection(true, &layer(1))).unwrap();
        assert_eq!(json["status"], "selected");
        assert_eq!(json["count"], 1);
        assert_eq!(json["table"]["columns"][0], "bin");
    }
}
