use serde::Deserialize;
use serde_json::Value as JsonValue;
use siteplan_core::models::{Geometry, ShapeKind};

/// Shape-drawn event from the map client
///
/// `geometry` may be a bare GeoJSON geometry or a Feature wrapping one, as
/// Leaflet.draw layers export either.
#[derive(Debug, Deserialize)]
pub struct ShapeRequest {
    #[serde(default)]
    pub kind: ShapeKind,
    pub geometry: JsonValue,
}

impl ShapeRequest {
    pub fn geometry(&self) -> Option<Geometry> {
        let geometry = match self.geometry.get("type").and_then(JsonValue::as_str) {
            Some("Feature") => self.geometry.get("geometry")?,
            _ => &self.geometry,
        };
        Geometry::from_geojson(geometry)
    }
}

/// Submit-message event from the chat panel
#[derive(Debug, Deserialize)]
pub struct MessageRequest {
    pub text: String,
}
