//! Select command implementation

use crate::cli::SelectArgs;
use crate::output::OutputWriter;
use crate::output_types::SelectOutput;
use anyhow::{bail, Context, Result};
use serde_json::Value as JsonValue;
use siteplan_core::config::LayeredConfig;
use siteplan_core::models::{DrawnShape, Geometry, ResultsPanel, ShapeKind};
use siteplan_geo::filter_features;
use siteplan_store::GeometryStore;
use std::fs;
use std::path::Path;

pub async fn execute(args: SelectArgs, config: &LayeredConfig, output: &OutputWriter) -> Result<()> {
    let collection = GeometryStore::new(config.data_path.value.clone()).load().await?;

    let shape = match (&args.shape, &args.bbox) {
        (Some(path), _) => Some(read_shape(path)?),
        (None, Some(bbox)) => {
            Some(DrawnShape::new(ShapeKind::Rectangle, Geometry::rectangle(parse_bbox(bbox)?))?)
        }
        (None, None) => None,
    };

    let panel = match &shape {
        None => ResultsPanel::Prompt,
        Some(shape) => {
            let selection = filter_features(&collection, Some(&shape.geometry));
            ResultsPanel::from_selection(true, &selection)
        }
    };

    let message = panel.message();
    let (count, table) = match panel {
        ResultsPanel::Prompt => (0, None),
        ResultsPanel::Selected { count, table } => (count, Some(table)),
    };

    if output.is_json() {
        return output.result(SelectOutput { message, count, table });
    }

    match table {
        Some(table) => {
            output.success(message);
            output.attribute_table(&table);
        }
        None => output.info(message),
    }

    Ok(())
}

/// Read a drawn shape from a GeoJSON file.
///
/// A FeatureCollection contributes its last feature, the most recent drawing.
fn read_shape(path: &Path) -> Result<DrawnShape> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read shape file {}", path.display()))?;
    let value: JsonValue = serde_json::from_str(&content)
        .with_context(|| format!("Shape file {} is not valid JSON", path.display()))?;

    let geometry = match value.get("type").and_then(JsonValue::as_str) {
        Some("FeatureCollection") => value
            .get("features")
            .and_then(JsonValue::as_array)
            .and_then(|features| features.last())
            .and_then(|feature| feature.get("geometry"))
            .context("Shape file has no features")?,
        Some("Feature") => value.get("geometry").context("Feature has no geometry")?,
        _ => &value,
    };

    let geometry =
        Geometry::from_geojson(geometry).context("Shape file holds no GeoJSON geometry")?;

    Ok(DrawnShape::new(ShapeKind::Polygon, geometry)?)
}

/// Parse `min_lon,min_lat,max_lon,max_lat`
fn parse_bbox(s: &str) -> Result<[f64; 4]> {
    let values = s
        .split(',')
        .map(|part| part.trim().parse::<f64>())
        .collect::<std::result::Result<Vec<_>, _>>()
        .with_context(|| format!("Invalid bbox: {}", s))?;

    let [min_x, min_y, max_x, max_y] = values[..] else {
        bail!("Invalid bbox: {}. Use min_lon,min_lat,max_lon,max_lat", s);
    };

    if min_x > max_x || min_y > max_y {
        bail!("Invalid bbox: {}. Minimum exceeds maximum", s);
    }

    Ok([min_x, min_y, max_x, max_y])
}
