//! Per-session state: the chat transcript and the last drawn shape.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::chat::Transcript;
use super::geometry::{Crs, Geometry};
use crate::error::{Result, SiteplanError};

/// Opaque session identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for SessionId {
    type Err = SiteplanError;

    fn from_str(s: &str) -> Result<Self> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|_| SiteplanError::SessionNotFound { id: s.to_string() })
    }
}

/// Drawing tool that produced a shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    #[default]
    Polygon,
    Rectangle,
}

/// The user's current selection shape, in the canonical CRS
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawnShape {
    pub kind: ShapeKind,
    pub geometry: Geometry,
    pub crs: Crs,
}

impl DrawnShape {
    /// Accept a shape from the drawing control.
    ///
    /// Only polygonal geometries can come out of the polygon and rectangle
    /// tools; self-intersections and zero-area rings are accepted as drawn.
    pub fn new(kind: ShapeKind, geometry: Geometry) -> Result<Self> {
        if !geometry.is_polygonal() {
            return Err(SiteplanError::InvalidGeometry {
                reason: format!(
                    "drawn shape must be a polygon or rectangle, got {:?}",
                    geometry.geometry_type()
                ),
            });
        }

        if geometry.is_empty() {
            return Err(SiteplanError::InvalidGeometry {
                reason: "drawn shape has no coordinates".to_string(),
            });
        }

        Ok(Self { kind, geometry, crs: Crs::wgs84() })
    }
}

/// Explicit context object threaded through every interaction of one session
#[derive(Debug, Clone, Serialize)]
pub struct SessionContext {
    pub id: SessionId,
    pub transcript: Transcript,
    pub drawn_shape: Option<DrawnShape>,
    pub created_at: DateTime<Utc>,
}

impl SessionContext {
    pub fn new(greeting: impl Into<String>) -> Self {
        Self {
            id: SessionId::new(),
            transcript: Transcript::with_greeting(greeting),
            drawn_shape: None,
            created_at: Utc::now(),
        }
    }

    /// Replace the active shape wholesale; the previous one is discarded
    pub fn record_shape(&mut self, shape: DrawnShape) {
        self.drawn_shape = Some(shape);
    }
}
