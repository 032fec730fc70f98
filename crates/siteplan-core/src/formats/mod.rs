//! Readers for the footprint data file
//!
//! A footprint layer is either an ESRI Shapefile or a GeoJSON document. Each
//! is handled by a [`FormatReader`]; [`FormatRegistry`] picks one from the
//! file extension.

use async_trait::async_trait;
use std::path::Path;

use crate::error::{Result, SiteplanError};
use crate::models::FeatureCollection;

pub mod geojson;
pub mod shapefile;
pub mod validation;

pub use self::geojson::GeoJsonReader;
pub use self::shapefile::ShapefileReader;
pub use self::validation::FormatValidation;

/// A vector format the footprint layer can be stored in
#[async_trait]
pub trait FormatReader: Send + Sync {
    /// Read every feature of the file, in the file's own CRS
    async fn read(&self, path: &Path) -> Result<FeatureCollection>;

    /// Lowercase extensions this reader claims
    fn supported_extensions(&self) -> &[&str];

    fn format_name(&self) -> &str;

    /// Cheap structural checks run before [`read`](FormatReader::read)
    async fn validate(&self, _path: &Path) -> Result<FormatValidation> {
        Ok(FormatValidation::default())
    }
}

/// Extension-based reader lookup
pub struct FormatRegistry {
    readers: Vec<Box<dyn FormatReader>>,
}

impl FormatRegistry {
    /// Registry over an explicit reader list, first match wins
    pub fn from_readers(readers: Vec<Box<dyn FormatReader>>) -> Self {
        Self { readers }
    }

    /// Shapefile and GeoJSON
    pub fn with_defaults() -> Self {
        Self::from_readers(vec![Box::new(ShapefileReader), Box::new(GeoJsonReader)])
    }

    /// Reader for `path`, chosen case-insensitively by extension
    pub fn detect_format(&self, path: &Path) -> Result<&dyn FormatReader> {
        let extension = path.extension().and_then(|e| e.to_str()).unwrap_or_default();

        self.readers
            .iter()
            .map(|reader| reader.as_ref())
            .find(|reader| {
                reader.supported_extensions().iter().any(|ext| ext.eq_ignore_ascii_case(extension))
            })
            .ok_or_else(|| SiteplanError::UnsupportedFormat {
                extension: if extension.is_empty() { "none" } else { extension }.to_string(),
                supported: self.supported_formats(),
            })
    }

    pub fn supported_formats(&self) -> Vec<String> {
        self.readers
            .iter()
            .flat_map(|reader| reader.supported_extensions())
            .map(|ext| ext.to_string())
            .collect()
    }
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
