//! Spatial predicates, the selection filter and the map centre

use geo::{Centroid, Geometry as GeoGeometry, GeometryCollection, Intersects, Polygon};
use siteplan_core::error::Result;
use siteplan_core::models::{Crs, FeatureCollection, Geometry};

use crate::models::to_geo_geometry;
use crate::transform::{normalize_collection, reproject_point};

/// True when the two geometries share at least one point, boundary included
pub fn intersects(a: &Geometry, b: &Geometry) -> bool {
    to_geo_geometry(a).intersects(&to_geo_geometry(b))
}

/// Select the features touched by a drawn shape.
///
/// With no shape the whole collection comes back unchanged. Otherwise the
/// result keeps the features whose geometry intersects `shape`, in their
/// original order. Both sides must already share a CRS.
pub fn filter_features(collection: &FeatureCollection, shape: Option<&Geometry>) -> FeatureCollection {
    let Some(shape) = shape else {
        return collection.clone();
    };

    let shape = to_geo_geometry(shape);
    let features = collection
        .iter()
        .filter(|feature| to_geo_geometry(&feature.geometry).intersects(&shape))
        .cloned()
        .collect();

    FeatureCollection::new(collection.name.clone(), collection.crs.clone(), features)
}

/// Centre of the footprint layer as WGS 84 `[lon, lat]`.
///
/// The layer is projected to Web Mercator, its polygons are dissolved into a
/// single area and the centroid of that area is projected back. Layers
/// without polygons fall back to the centroid of all their geometries.
/// Returns `None` when no centroid exists, e.g. for an empty layer.
pub fn map_center(collection: &FeatureCollection) -> Result<Option<[f64; 2]>> {
    let planar_crs = Crs::web_mercator();
    let projected = normalize_collection(collection.clone(), &planar_crs)?;

    let geometries: Vec<GeoGeometry<f64>> =
        projected.iter().map(|feature| to_geo_geometry(&feature.geometry)).collect();

    let polygons: Vec<Polygon<f64>> = geometries
        .iter()
        .flat_map(|geometry| match geometry {
            GeoGeometry::Polygon(p) => vec![p.clone()],
            GeoGeometry::MultiPolygon(mp) => mp.0.clone(),
            _ => Vec::new(),
        })
        .collect();

    let centroid = if polygons.is_empty() {
        GeometryCollection::from(geometries).centroid()
    } else {
        geo::unary_union(&polygons).centroid()
    };

    let Some(centroid) = centroid else {
        tracing::debug!(name = %collection.name, "Collection has no centroid");
        return Ok(None);
    };

    reproject_point([centroid.x(), centroid.y()], &planar_crs, &Crs::wgs84()).map(Some)
}
