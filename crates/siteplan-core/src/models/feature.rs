//! Building footprints and the collection they are loaded into.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

use super::geometry::{Crs, Geometry};

/// Positional identity of a feature within its source file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureId(pub usize);

/// One stored polygon with its attribute record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    pub id: FeatureId,
    pub geometry: Geometry,
    pub properties: Map<String, JsonValue>,
}

impl Feature {
    pub fn new(id: FeatureId, geometry: Geometry, properties: Map<String, JsonValue>) -> Self {
        Self { id, geometry, properties }
    }
}

/// Ordered features sharing one coordinate reference system
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureCollection {
    pub name: String,
    pub crs: Crs,
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    pub fn new(name: impl Into<String>, crs: Crs, features: Vec<Feature>) -> Self {
        Self { name: name.into(), crs, features }
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Feature> {
        self.features.iter()
    }

    /// Attribute names in first-seen order across all features
    pub fn columns(&self) -> Vec<String> {
        let mut columns: Vec<String> = Vec::new();
        for feature in &self.features {
            for key in feature.properties.keys() {
                if !columns.iter().any(|c| c == key) {
                    columns.push(key.clone());
                }
            }
        }
        columns
    }

    /// Attribute table of the collection, geometry excluded
    pub fn attribute_table(&self) -> AttributeTable {
        let columns = self.columns();
        let rows = self
            .features
            .iter()
            .map(|feature| AttributeRow {
                id: feature.id,
                values: columns
                    .iter()
                    .map(|c| feature.properties.get(c).cloned().unwrap_or(JsonValue::Null))
                    .collect(),
            })
            .collect();

        AttributeTable { columns, rows }
    }

    /// Convert to a GeoJSON FeatureCollection for the map client
    pub fn to_geojson(&self) -> geojson::FeatureCollection {
        let features = self
            .features
            .iter()
            .map(|feature| geojson::Feature {
                bbox: None,
                geometry: geojson::Geometry::from_json_value(feature.geometry.to_geojson()).ok(),
                id: Some(geojson::feature::Id::Number(feature.id.0.into())),
                properties: Some(feature.properties.clone()),
                foreign_members: None,
            })
            .collect();

        geojson::FeatureCollection {
            bbox: None,
            features,
            foreign_members: None,
        }
    }
}

impl<'a> IntoIterator for &'a FeatureCollection {
    type Item = &'a Feature;
    type IntoIter = std::slice::Iter<'a, Feature>;

    fn into_iter(self) -> Self::IntoIter {
        self.features.iter()
    }
}

/// Attribute values of one feature, aligned with [`AttributeTable::columns`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttributeRow {
    pub id: FeatureId,
    pub values: Vec<JsonValue>,
}

/// Tabular view of a collection's attributes
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttributeTable {
    pub columns: Vec<String>,
    pub rows: Vec<AttributeRow>,
}
