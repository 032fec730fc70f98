//! Structural checks on a footprint file before it is read

use std::fs;
use std::path::Path;

/// Problems found by a pre-read check.
///
/// Errors stop the load; warnings are logged and the load goes ahead.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormatValidation {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl FormatValidation {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Append the findings of a later check
    pub fn merge(mut self, other: FormatValidation) -> Self {
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
        self
    }
}

/// The path names a regular file
pub fn check_file(path: &Path) -> FormatValidation {
    let mut validation = FormatValidation::default();

    match fs::metadata(path) {
        Ok(metadata) if metadata.is_file() => {}
        Ok(_) => validation.errors.push(format!("Not a regular file: {}", path.display())),
        Err(_) => validation.errors.push(format!("File not found: {}", path.display())),
    }

    validation
}

/// Sidecar files of a multi-file format, e.g. `.shx` and `.dbf` next to a `.shp`.
///
/// A missing required sidecar is an error, a missing optional one a warning.
pub fn check_sidecars(base: &Path, required: &[&str], optional: &[&str]) -> FormatValidation {
    let missing = |ext: &&str| {
        let sidecar = base.with_extension(ext);
        (!sidecar.exists()).then(|| sidecar.display().to_string())
    };

    FormatValidation {
        errors: required
            .iter()
            .filter_map(missing)
            .map(|path| format!("Missing required file: {}", path))
            .collect(),
        warnings: optional
            .iter()
            .filter_map(missing)
            .map(|path| format!("Optional file not found: {}", path))
            .collect(),
    }
}

/// The file parses as JSON
pub fn check_json(path: &Path) -> FormatValidation {
    let mut validation = FormatValidation::default();

    let parsed = fs::read_to_string(path)
        .map_err(|e| format!("Cannot read file: {}", e))
        .and_then(|content| {
            serde_json::from_str::<serde_json::Value>(&content)
                .map_err(|e| format!("Invalid JSON structure: {}", e))
        });

    if let Err(message) = parsed {
        validation.errors.push(message);
    }

    validation
}
