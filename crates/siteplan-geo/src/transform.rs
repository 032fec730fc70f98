//! CRS transformation and normalization

use geo::{Coord, MapCoords};
use proj::Proj;
use siteplan_core::error::{Result, SiteplanError};
use siteplan_core::models::{Crs, FeatureCollection, Geometry};

use crate::models::{from_geo_geometry, to_geo_geometry};

/// Check if two CRS describe the same system
pub fn crs_match(crs1: &Crs, crs2: &Crs) -> bool {
    crs1.definition() == crs2.definition()
}

fn projection(from_crs: &Crs, to_crs: &Crs) -> Result<Proj> {
    Proj::new_known_crs(&from_crs.definition(), &to_crs.definition(), None).map_err(|e| {
        SiteplanError::Projection {
            reason: format!("Failed to create projection from {} to {}: {}", from_crs, to_crs, e),
        }
    })
}

fn apply(proj: &Proj, geometry: &Geometry) -> Result<Geometry> {
    let transformed = to_geo_geometry(geometry)
        .try_map_coords(|coord| proj.convert((coord.x, coord.y)).map(|(x, y)| Coord { x, y }))
        .map_err(|e| SiteplanError::Projection {
            reason: format!("Projection failed: {}", e),
        })?;

    from_geo_geometry(&transformed).ok_or_else(|| SiteplanError::Projection {
        reason: "Projection produced a geometry collection".to_string(),
    })
}

/// Reproject a geometry from one CRS to another
pub fn reproject_geometry(geometry: &Geometry, from_crs: &Crs, to_crs: &Crs) -> Result<Geometry> {
    if crs_match(from_crs, to_crs) {
        return Ok(geometry.clone());
    }

    apply(&projection(from_crs, to_crs)?, geometry)
}

/// Reproject a single `[x, y]` position
pub fn reproject_point(point: [f64; 2], from_crs: &Crs, to_crs: &Crs) -> Result<[f64; 2]> {
    if crs_match(from_crs, to_crs) {
        return Ok(point);
    }

    let (x, y) = projection(from_crs, to_crs)?.convert((point[0], point[1])).map_err(|e| {
        SiteplanError::Projection {
            reason: format!("Projection failed: {}", e),
        }
    })?;

    Ok([x, y])
}

/// Reproject every feature of a collection into `target`.
///
/// Feature order, identifiers and attributes are preserved; only
/// coordinates change. A single projection is built for the whole layer.
pub fn normalize_collection(collection: FeatureCollection, target: &Crs) -> Result<FeatureCollection> {
    if crs_match(&collection.crs, target) {
        return Ok(collection);
    }

    let proj = projection(&collection.crs, target)?;

    let FeatureCollection { name, crs, features } = collection;
    let features = features
        .into_iter()
        .map(|mut feature| {
            feature.geometry = apply(&proj, &feature.geometry)?;
            Ok(feature)
        })
        .collect::<Result<Vec<_>>>()?;

    tracing::debug!(
        name = %name,
        from = %crs,
        to = %target,
        features = features.len(),
        "Reprojected collection"
    );

    Ok(FeatureCollection::new(name, target.clone(), features))
}
