//! Shapefile format reader implementation
//!
//! Shapefiles consist of multiple component files (.shp, .shx, .dbf, .prj).
//! The first three must be present; the `.prj` supplies the CRS and is
//! assumed to be WGS 84 when missing.

use async_trait::async_trait;
use serde_json::{Map, Number, Value as JsonValue};
use shapefile::dbase::{FieldValue as DbaseFieldValue, Record};
use shapefile::{PolygonRing, Shape};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, SiteplanError};
use crate::formats::validation::{check_file, check_sidecars};
use crate::formats::{FormatReader, FormatValidation};
use crate::models::{Crs, Feature, FeatureCollection, FeatureId, Geometry};

const REQUIRED_COMPONENTS: [&str; 3] = ["shp", "shx", "dbf"];

/// Shapefile format reader
pub struct ShapefileReader;

#[async_trait]
impl FormatReader for ShapefileReader {
    async fn read(&self, path: &Path) -> Result<FeatureCollection> {
        let path = path.to_path_buf();

        // The shapefile crate is synchronous
        tokio::task::spawn_blocking(move || read_shapefile(&path)).await.map_err(|e| {
            SiteplanError::FormatError {
                format: "Shapefile".to_string(),
                message: format!("Reader task failed: {}", e),
            }
        })?
    }

    fn supported_extensions(&self) -> &[&str] {
        &["shp"]
    }

    fn format_name(&self) -> &str {
        "Shapefile"
    }

    async fn validate(&self, path: &Path) -> Result<FormatValidation> {
        let mut validation = check_file(path);
        if !validation.is_valid() {
            return Ok(validation);
        }

        match shapefile_base(path) {
            Ok(base) => Ok(validation.merge(check_sidecars(&base, &REQUIRED_COMPONENTS, &["prj"]))),
            Err(e) => {
                validation.errors.push(format!("Invalid Shapefile path: {}", e));
                Ok(validation)
            }
        }
    }
}

fn read_shapefile(path: &Path) -> Result<FeatureCollection> {
    verify_components(path)?;

    let crs = extract_crs(path)?;

    let mut reader = shapefile::Reader::from_path(path)
        .map_err(|e| format_error(format!("Failed to open Shapefile: {}", e)))?;

    let features = collect_features(reader.iter_shapes_and_records())?;

    let name = path.file_stem().and_then(|s| s.to_str()).unwrap_or("unnamed").to_string();

    tracing::debug!(name = %name, features = features.len(), crs = %crs, "Read Shapefile");

    Ok(FeatureCollection::new(name, crs, features))
}

/// Features in file order; a feature's id is its record number, so ids keep
/// their gaps where null shapes were skipped
fn collect_features<I>(rows: I) -> Result<Vec<Feature>>
where
    I: IntoIterator<Item = std::result::Result<(Shape, Record), shapefile::Error>>,
{
    let mut features = Vec::new();
    for (row, result) in rows.into_iter().enumerate() {
        let (shape, record) =
            result.map_err(|e| format_error(format!("Failed to read record {}: {}", row, e)))?;

        let Some(geometry) = convert_shape(shape)? else {
            tracing::debug!(row, "Skipping null shape");
            continue;
        };

        features.push(Feature::new(FeatureId(row), geometry, extract_properties(record)));
    }

    Ok(features)
}

fn format_error(message: String) -> SiteplanError {
    SiteplanError::FormatError {
        format: "Shapefile".to_string(),
        message,
    }
}

/// Get the base path for a Shapefile (without extension)
fn shapefile_base(path: &Path) -> Result<PathBuf> {
    let is_shp = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("shp"))
        .unwrap_or(false);

    if !is_shp {
        return Err(format_error(format!("Not a Shapefile (.shp): {}", path.display())));
    }

    Ok(path.with_extension(""))
}

/// Verify that all required Shapefile component files exist
fn verify_components(path: &Path) -> Result<()> {
    let base = shapefile_base(path)?;

    let missing: Vec<String> = REQUIRED_COMPONENTS
        .iter()
        .filter(|ext| !base.with_extension(ext).exists())
        .map(|ext| format!(".{}", ext))
        .collect();

    if !missing.is_empty() {
        return Err(format_error(format!(
            "Missing required component files: {}",
            missing.join(", ")
        )));
    }

    Ok(())
}

/// Extract CRS from the Shapefile .prj file
fn extract_crs(path: &Path) -> Result<Crs> {
    let prj_path = shapefile_base(path)?.with_extension("prj");

    if !prj_path.exists() {
        tracing::warn!(path = %path.display(), "No .prj file, assuming EPSG:4326");
        return Ok(Crs::wgs84());
    }

    let prj_content = fs::read_to_string(&prj_path)
        .map_err(|e| format_error(format!("Failed to read .prj file: {}", e)))?;

    Ok(Crs::from_wkt(&prj_content))
}

/// x/y access shared by the 2D, M and Z point types
trait PlanarPoint {
    fn xy(&self) -> [f64; 2];
}

impl PlanarPoint for shapefile::Point {
    fn xy(&self) -> [f64; 2] {
        [self.x, self.y]
    }
}

impl PlanarPoint for shapefile::PointM {
    fn xy(&self) -> [f64; 2] {
        [self.x, self.y]
    }
}

impl PlanarPoint for shapefile::PointZ {
    fn xy(&self) -> [f64; 2] {
        [self.x, self.y]
    }
}

fn coords<P: PlanarPoint>(points: &[P]) -> Vec<[f64; 2]> {
    points.iter().map(PlanarPoint::xy).collect()
}

/// Group shapefile rings into polygons: every outer ring opens a new polygon
/// and the inner rings that follow it are its holes.
fn polygon_from_rings<P: PlanarPoint>(rings: &[PolygonRing<P>]) -> Geometry {
    let mut polygons: Vec<Vec<Vec<[f64; 2]>>> = Vec::new();

    for ring in rings {
        match ring {
            PolygonRing::Outer(points) => polygons.push(vec![coords(points)]),
            PolygonRing::Inner(points) => match polygons.last_mut() {
                Some(polygon) => polygon.push(coords(points)),
                None => polygons.push(vec![coords(points)]),
            },
        }
    }

    if polygons.len() == 1 {
        Geometry::Polygon { coordinates: polygons.remove(0) }
    } else {
        Geometry::MultiPolygon { coordinates: polygons }
    }
}

fn line_from_parts<P: PlanarPoint>(parts: &[Vec<P>]) -> Geometry {
    let mut lines: Vec<Vec<[f64; 2]>> = parts.iter().map(|part| coords(part)).collect();

    if lines.len() == 1 {
        Geometry::LineString { coordinates: lines.remove(0) }
    } else {
        Geometry::MultiLineString { coordinates: lines }
    }
}

/// Convert a shapefile Shape; `None` for null shapes
fn convert_shape(shape: Shape) -> Result<Option<Geometry>> {
    let geometry = match shape {
        Shape::NullShape => return Ok(None),
        Shape::Point(p) => Geometry::Point { coordinates: p.xy() },
        Shape::PointM(p) => Geometry::Point { coordinates: p.xy() },
        Shape::PointZ(p) => Geometry::Point { coordinates: p.xy() },
        Shape::Polyline(line) => line_from_parts(line.parts()),
        Shape::PolylineM(line) => line_from_parts(line.parts()),
        Shape::PolylineZ(line) => line_from_parts(line.parts()),
        Shape::Polygon(polygon) => polygon_from_rings(polygon.rings()),
        Shape::PolygonM(polygon) => polygon_from_rings(polygon.rings()),
        Shape::PolygonZ(polygon) => polygon_from_rings(polygon.rings()),
        Shape::Multipoint(mp) => Geometry::MultiPoint { coordinates: coords(mp.points()) },
        Shape::MultipointM(mp) => Geometry::MultiPoint { coordinates: coords(mp.points()) },
        Shape::MultipointZ(mp) => Geometry::MultiPoint { coordinates: coords(mp.points()) },
        Shape::Multipatch(_) => {
            return Err(format_error("Multipatch geometry type is not supported".to_string()))
        }
    };

    Ok(Some(geometry))
}

/// Extract properties from DBF record
fn extract_properties(record: Record) -> Map<String, JsonValue> {
    record.into_iter().map(|(name, value)| (name, convert_dbase_value(value))).collect()
}

fn number(value: f64) -> JsonValue {
    Number::from_f64(value).map(JsonValue::Number).unwrap_or(JsonValue::Null)
}

/// Convert dBase field value to JSON value
fn convert_dbase_value(value: DbaseFieldValue) -> JsonValue {
    match value {
        DbaseFieldValue::Character(Some(s)) => JsonValue::String(s.trim_end().to_string()),
        DbaseFieldValue::Numeric(Some(n)) => number(n),
        DbaseFieldValue::Logical(Some(b)) => JsonValue::Bool(b),
        DbaseFieldValue::Date(Some(date)) => JsonValue::String(format!(
            "{:04}-{:02}-{:02}",
            date.year(),
            date.month(),
            date.day()
        )),
        DbaseFieldValue::Float(Some(f)) => number(f as f64),
        DbaseFieldValue::Integer(i) => JsonValue::Number(i.into()),
        DbaseFieldValue::Currency(c) => number(c),
        DbaseFieldValue::DateTime(dt) => JsonValue::String(format!(
            "{:04}-{:02}-{:02}",
            dt.date().year(),
            dt.date().month(),
            dt.date().day()
        )),
        DbaseFieldValue::Double(d) => number(d),
        DbaseFieldValue::Memo(s) => JsonValue::String(s),
        _ => JsonValue::Null,
    }
}
