//! GeoJSON format reader implementation

use async_trait::async_trait;
use serde_json::Map;
use std::path::Path;

use crate::error::{Result, SiteplanError};
use crate::formats::validation::{check_file, check_json};
use crate::formats::{FormatReader, FormatValidation};
use crate::models::{Crs, Feature, FeatureCollection, FeatureId, Geometry};

/// GeoJSON format reader
pub struct GeoJsonReader;

#[async_trait]
impl FormatReader for GeoJsonReader {
    async fn read(&self, path: &Path) -> Result<FeatureCollection> {
        let content = tokio::fs::read_to_string(path).await?;

        let geojson: geojson::GeoJson = content.parse().map_err(|e| SiteplanError::FormatError {
            format: "GeoJSON".to_string(),
            message: format!("Failed to parse GeoJSON: {}", e),
        })?;

        let (features, crs) = self.extract_features_and_crs(&geojson);

        let name = path.file_stem().and_then(|s| s.to_str()).unwrap_or("unnamed").to_string();

        Ok(FeatureCollection::new(name, crs, features))
    }

    fn supported_extensions(&self) -> &[&str] {
        &["geojson", "json"]
    }

    fn format_name(&self) -> &str {
        "GeoJSON"
    }

    async fn validate(&self, path: &Path) -> Result<FormatValidation> {
        let validation = check_file(path);
        if !validation.is_valid() {
            return Ok(validation);
        }

        Ok(validation.merge(check_json(path)))
    }
}

impl GeoJsonReader {
    /// Extract features and CRS from GeoJSON
    fn extract_features_and_crs(&self, geojson: &geojson::GeoJson) -> (Vec<Feature>, Crs) {
        match geojson {
            geojson::GeoJson::FeatureCollection(fc) => {
                let features = fc
                    .features
                    .iter()
                    .enumerate()
                    .filter_map(|(idx, feature)| self.convert_feature(feature, idx))
                    .collect();

                // RFC 7946 drops the crs member, older exports still carry it
                let crs = fc
                    .foreign_members
                    .as_ref()
                    .and_then(|fm| fm.get("crs"))
                    .and_then(extract_crs)
                    .unwrap_or_default();

                (features, crs)
            }
            geojson::GeoJson::Feature(feature) => {
                (self.convert_feature(feature, 0).into_iter().collect(), Crs::wgs84())
            }
            geojson::GeoJson::Geometry(geom) => {
                let features = convert_geometry(geom)
                    .map(|geometry| Feature::new(FeatureId(0), geometry, Map::new()))
                    .into_iter()
                    .collect();
                (features, Crs::wgs84())
            }
        }
    }

    /// Convert a GeoJSON feature, dropping it when it carries no usable geometry
    fn convert_feature(&self, feature: &geojson::Feature, idx: usize) -> Option<Feature> {
        let Some(geometry) = feature.geometry.as_ref().and_then(convert_geometry) else {
            tracing::warn!(row = idx, "Skipping GeoJSON feature without a supported geometry");
            return None;
        };

        let properties = feature.properties.clone().unwrap_or_default();

        Some(Feature::new(FeatureId(idx), geometry, properties))
    }
}

fn convert_geometry(geometry: &geojson::Geometry) -> Option<Geometry> {
    Geometry::from_geojson_value(&geometry.value)
}

/// Extract the CRS from a legacy `crs` member
fn extract_crs(crs: &serde_json::Value) -> Option<Crs> {
    let name = crs.get("properties")?.get("name")?.as_str()?;
    Crs::from_name(name)
}
