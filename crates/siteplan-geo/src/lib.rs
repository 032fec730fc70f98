//! Siteplan Geo - CRS reprojection and spatial operations
//!
//! This crate bridges the canonical geometry model to the `geo` and `proj`
//! crates: reprojection of whole collections, the intersects filter behind a
//! site selection, and the centre of the footprint layer.

pub mod models;
pub mod spatial;
pub mod transform;

pub use spatial::{filter_features, intersects, map_center};
pub use transform::{normalize_collection, reproject_geometry, reproject_point};
