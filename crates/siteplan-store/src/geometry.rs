//! Process-wide footprint layer

use siteplan_core::error::{Result, SiteplanError};
use siteplan_core::formats::FormatRegistry;
use siteplan_core::models::{Crs, FeatureCollection};
use siteplan_geo::normalize_collection;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::OnceCell;

/// Loads the building footprint file once and shares it.
///
/// The first successful [`load`](GeometryStore::load) reads the file,
/// reprojects it to WGS 84 and caches the result; later calls return the
/// same `Arc` without touching the disk. A failed load is not cached.
pub struct GeometryStore {
    path: PathBuf,
    registry: FormatRegistry,
    collection: OnceCell<Arc<FeatureCollection>>,
}

impl GeometryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_registry(path, FormatRegistry::with_defaults())
    }

    pub fn with_registry(path: impl Into<PathBuf>, registry: FormatRegistry) -> Self {
        Self {
            path: path.into(),
            registry,
            collection: OnceCell::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_loaded(&self) -> bool {
        self.collection.initialized()
    }

    /// The footprint layer in EPSG:4326
    pub async fn load(&self) -> Result<Arc<FeatureCollection>> {
        self.collection.get_or_try_init(|| self.read()).await.cloned()
    }

    async fn read(&self) -> Result<Arc<FeatureCollection>> {
        let path = self.path.as_path();
        let fail = |reason: String| SiteplanError::data_load(path, reason);

        let reader = self.registry.detect_format(path).map_err(|e| fail(e.to_string()))?;

        let validation = reader.validate(path).await.map_err(|e| fail(e.to_string()))?;
        for warning in &validation.warnings {
            tracing::warn!(path = %path.display(), "{}", warning);
        }
        if !validation.is_valid() {
            return Err(fail(validation.errors.join("; ")));
        }

        let collection = reader.read(path).await.map_err(|e| fail(e.to_string()))?;
        if collection.is_empty() {
            return Err(fail("file contains no features with geometry".to_string()));
        }

        let source_crs = collection.crs.clone();
        let collection =
            normalize_collection(collection, &Crs::wgs84()).map_err(|e| fail(e.to_string()))?;

        tracing::info!(
            path = %path.display(),
            format = reader.format_name(),
            features = collection.len(),
            source_crs = %source_crs,
            "Loaded footprint layer"
        );

        Ok(Arc::new(collection))
    }
}
