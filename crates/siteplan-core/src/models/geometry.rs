//! Canonical geometry types used across all siteplan crates.
//!
//! These types provide a bridge between GeoJSON serialization and the
//! computational geo crate types.

use serde::{Deserialize, Serialize};

/// EPSG code used when a coordinate reference system is only known by its WKT
pub const UNKNOWN_EPSG: u32 = 0;

/// Coordinate Reference System
///
/// Identified by EPSG code when one is known. Shapefiles exported without an
/// authority code keep their `.prj` WKT so PROJ can still build a transform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Crs {
    pub epsg: u32,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wkt: Option<String>,
}

impl Default for Crs {
    fn default() -> Self {
        Self::wgs84()
    }
}

impl Crs {
    pub fn new(epsg: u32, name: impl Into<String>) -> Self {
        Self { epsg, name: name.into(), wkt: None }
    }

    /// WGS 84 (EPSG:4326)
    pub fn wgs84() -> Self {
        Self::new(4326, "WGS 84")
    }

    /// Web Mercator (EPSG:3857)
    pub fn web_mercator() -> Self {
        Self::new(3857, "Web Mercator")
    }

    /// Build from a bare EPSG code
    pub fn from_epsg(epsg: u32) -> Self {
        match epsg {
            4326 => Self::wgs84(),
            3857 => Self::web_mercator(),
            code => Self::new(code, format!("EPSG:{}", code)),
        }
    }

    /// Build from an OGC WKT definition, as found in a `.prj` file
    pub fn from_wkt(wkt: &str) -> Self {
        let wkt = wkt.trim();
        let name = wkt_name(wkt).unwrap_or_else(|| "unnamed".to_string());

        match top_level_epsg(wkt) {
            Some(epsg) => Self::new(epsg, name),
            None => Self {
                epsg: UNKNOWN_EPSG,
                name,
                wkt: Some(wkt.to_string()),
            },
        }
    }

    /// Parse a GeoJSON `crs` name such as `EPSG:3857`,
    /// `urn:ogc:def:crs:EPSG::3857` or `urn:ogc:def:crs:OGC:1.3:CRS84`
    pub fn from_name(name: &str) -> Option<Self> {
        if name.ends_with("CRS84") {
            return Some(Self::wgs84());
        }

        let code = name.rsplit(':').next()?;
        code.parse::<u32>().ok().map(Self::from_epsg)
    }

    /// Definition string handed to PROJ
    pub fn definition(&self) -> String {
        match (&self.wkt, self.epsg) {
            (Some(wkt), UNKNOWN_EPSG) => wkt.clone(),
            _ => format!("EPSG:{}", self.epsg),
        }
    }

    pub fn is_wgs84(&self) -> bool {
        self.epsg == 4326
    }
}

impl std::fmt::Display for Crs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.epsg == UNKNOWN_EPSG {
            write!(f, "{} (custom WKT)", self.name)
        } else {
            write!(f, "EPSG:{} ({})", self.epsg, self.name)
        }
    }
}

/// Name of the outermost WKT node, e.g. `NAD83 / UTM zone 18N`
fn wkt_name(wkt: &str) -> Option<String> {
    let start = wkt.find("[\"")? + 2;
    let end = wkt[start..].find('"')?;
    Some(wkt[start..start + end].to_string())
}

/// EPSG code of the outermost `AUTHORITY["EPSG","code"]` node.
///
/// Only the authority closing the whole definition names the CRS itself; the
/// inner ones belong to datums, units, or the base geographic system.
fn top_level_epsg(wkt: &str) -> Option<u32> {
    const MARKER: &str = "AUTHORITY[\"EPSG\",\"";

    let start = wkt.rfind(MARKER)? + MARKER.len();
    let end = wkt[start..].find('"')?;
    let code = wkt[start..start + end].parse::<u32>().ok()?;

    let rest = wkt[start + end..].strip_prefix("\"]")?;
    if rest.chars().all(|c| c == ']' || c.is_whitespace()) {
        Some(code)
    } else {
        None
    }
}

/// Geometry type classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum GeometryType {
    #[default]
    Point,
    LineString,
    Polygon,
    MultiPoint,
    MultiLineString,
    MultiPolygon,
}

/// GeoJSON-compatible geometry representation
///
/// This enum directly maps to GeoJSON geometry types with coordinate arrays.
/// It can be serialized/deserialized as GeoJSON and converted to/from `geo` crate types.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Geometry {
    Point {
        coordinates: [f64; 2],
    },
    LineString {
        coordinates: Vec<[f64; 2]>,
    },
    Polygon {
        coordinates: Vec<Vec<[f64; 2]>>,
    },
    MultiPoint {
        coordinates: Vec<[f64; 2]>,
    },
    MultiLineString {
        coordinates: Vec<Vec<[f64; 2]>>,
    },
    MultiPolygon {
        coordinates: Vec<Vec<Vec<[f64; 2]>>>,
    },
}

impl Geometry {
    /// Create a Point geometry
    pub fn point(x: f64, y: f64) -> Self {
        Geometry::Point { coordinates: [x, y] }
    }

    /// Create a Polygon geometry
    pub fn polygon(rings: Vec<Vec<[f64; 2]>>) -> Self {
        Geometry::Polygon { coordinates: rings }
    }

    /// Axis-aligned rectangle from `[min_x, min_y, max_x, max_y]`
    pub fn rectangle(bbox: [f64; 4]) -> Self {
        let [min_x, min_y, max_x, max_y] = bbox;
        Geometry::polygon(vec![vec![
            [min_x, min_y],
            [max_x, min_y],
            [max_x, max_y],
            [min_x, max_y],
            [min_x, min_y],
        ]])
    }

    /// Get the geometry type
    pub fn geometry_type(&self) -> GeometryType {
        match self {
            Geometry::Point { .. } => GeometryType::Point,
            Geometry::LineString { .. } => GeometryType::LineString,
            Geometry::Polygon { .. } => GeometryType::Polygon,
            Geometry::MultiPoint { .. } => GeometryType::MultiPoint,
            Geometry::MultiLineString { .. } => GeometryType::MultiLineString,
            Geometry::MultiPolygon { .. } => GeometryType::MultiPolygon,
        }
    }

    /// Polygon or MultiPolygon
    pub fn is_polygonal(&self) -> bool {
        matches!(self, Geometry::Polygon { .. } | Geometry::MultiPolygon { .. })
    }

    /// True when the geometry has no coordinates at all
    pub fn is_empty(&self) -> bool {
        match self {
            Geometry::Point { .. } => false,
            Geometry::LineString { coordinates } | Geometry::MultiPoint { coordinates } => {
                coordinates.is_empty()
            }
            Geometry::Polygon { coordinates } | Geometry::MultiLineString { coordinates } => {
                coordinates.iter().all(|part| part.is_empty())
            }
            Geometry::MultiPolygon { coordinates } => {
                coordinates.iter().flatten().all(|ring| ring.is_empty())
            }
        }
    }

    /// Parse a GeoJSON geometry object.
    ///
    /// Positions may carry altitude or further ordinates; only x and y are
    /// kept. `None` for unknown types, geometry collections and positions
    /// with fewer than two values.
    pub fn from_geojson(value: &serde_json::Value) -> Option<Self> {
        let geometry = geojson::Geometry::from_json_value(value.clone()).ok()?;
        Self::from_geojson_value(&geometry.value)
    }

    /// Convert a parsed `geojson` geometry value, keeping x and y of every position
    pub fn from_geojson_value(value: &geojson::Value) -> Option<Self> {
        let geometry = match value {
            geojson::Value::Point(p) => Geometry::Point { coordinates: position(p)? },
            geojson::Value::MultiPoint(points) => {
                Geometry::MultiPoint { coordinates: positions(points)? }
            }
            geojson::Value::LineString(line) => {
                Geometry::LineString { coordinates: positions(line)? }
            }
            geojson::Value::MultiLineString(lines) => Geometry::MultiLineString {
                coordinates: lines.iter().map(|line| positions(line)).collect::<Option<_>>()?,
            },
            geojson::Value::Polygon(rings) => Geometry::Polygon { coordinates: polygon_rings(rings)? },
            geojson::Value::MultiPolygon(polygons) => Geometry::MultiPolygon {
                coordinates: polygons
                    .iter()
                    .map(|rings| polygon_rings(rings))
                    .collect::<Option<_>>()?,
            },
            geojson::Value::GeometryCollection(_) => return None,
        };

        Some(geometry)
    }

    /// Convert to serde_json::Value (GeoJSON)
    pub fn to_geojson(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

fn position(p: &[f64]) -> Option<[f64; 2]> {
    match p {
        [x, y, ..] => Some([*x, *y]),
        _ => None,
    }
}

fn positions(points: &[Vec<f64>]) -> Option<Vec<[f64; 2]>> {
    points.iter().map(|p| position(p)).collect()
}

fn polygon_rings(rings: &[Vec<Vec<f64>>]) -> Option<Vec<Vec<[f64; 2]>>> {
    rings.iter().map(|ring| positions(ring)).collect()
}
