//! Declarative description of the selection map handed to the browser client.

use serde::Serialize;

use super::feature::FeatureCollection;

/// CARTO Positron basemap
pub const POSITRON_TILES: &str = "https://{s}.basemaps.cartocdn.com/light_all/{z}/{x}/{y}{r}.png";

const POSITRON_ATTRIBUTION: &str = "&copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors &copy; <a href=\"https://carto.com/attributions\">CARTO</a>";

/// Map centre in geographic coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MapCenter {
    pub lat: f64,
    pub lon: f64,
}

impl MapCenter {
    /// From a `[lon, lat]` coordinate pair
    pub fn from_lon_lat([lon, lat]: [f64; 2]) -> Self {
        Self { lat, lon }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TileLayer {
    pub name: &'static str,
    pub url: &'static str,
    pub attribution: &'static str,
}

impl Default for TileLayer {
    fn default() -> Self {
        Self {
            name: "cartodbpositron",
            url: POSITRON_TILES,
            attribution: POSITRON_ATTRIBUTION,
        }
    }
}

/// Footprint styling, in Leaflet path option names
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PolygonStyle {
    pub fill_color: &'static str,
    pub color: &'static str,
    pub weight: u32,
    pub fill_opacity: f64,
}

impl Default for PolygonStyle {
    fn default() -> Self {
        Self {
            fill_color: "#3186cc",
            color: "black",
            weight: 1,
            fill_opacity: 0.3,
        }
    }
}

/// Which Leaflet.draw tools are offered
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DrawOptions {
    pub polygon: bool,
    pub rectangle: bool,
    pub polyline: bool,
    pub circle: bool,
    pub marker: bool,
    pub circlemarker: bool,
}

impl Default for DrawOptions {
    fn default() -> Self {
        Self {
            polygon: true,
            rectangle: true,
            polyline: false,
            circle: false,
            marker: false,
            circlemarker: false,
        }
    }
}

/// Basemap, footprint layer and drawing control
#[derive(Debug, Clone, Serialize)]
pub struct MapWidget {
    pub center: MapCenter,
    pub zoom: u8,
    pub tiles: TileLayer,
    pub style: PolygonStyle,
    pub draw: DrawOptions,
    /// Editing of already drawn shapes
    pub edit: bool,
    pub layer: geojson::FeatureCollection,
}

impl MapWidget {
    pub fn render(collection: &FeatureCollection, center: MapCenter, zoom: u8) -> Self {
        Self {
            center,
            zoom,
            tiles: TileLayer::default(),
            style: PolygonStyle::default(),
            draw: DrawOptions::default(),
            edit: false,
            layer: collection.to_geojson(),
        }
    }
}
