pub mod chat;
pub mod feature;
pub mod geometry;
pub mod map;
pub mod panel;
pub mod session;

pub use chat::{Alignment, ChatTurn, Speaker, Transcript};
pub use feature::{AttributeRow, AttributeTable, Feature, FeatureCollection, FeatureId};
pub use geometry::{Crs, Geometry, GeometryType};
pub use map::{DrawOptions, MapCenter, MapWidget, PolygonStyle, TileLayer};
pub use panel::{ResultsPanel, SELECT_PROMPT};
pub use session::{DrawnShape, SessionContext, SessionId, ShapeKind};
