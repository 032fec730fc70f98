use serde::Serialize;
use siteplan_core::models::{AttributeTable, ChatTurn, GeometryType};

/// Output for inspect command
#[derive(Debug, Serialize)]
pub struct InspectOutput {
    pub path: String,
    pub name: String,
    pub feature_count: usize,
    pub crs: String,
    pub geometry_types: Vec<GeometryType>,
    pub columns: Vec<String>,
    /// `[lon, lat]`, absent when the layer has no centroid
    pub center: Option<[f64; 2]>,
}

/// Output for select command
#[derive(Debug, Serialize)]
pub struct SelectOutput {
    pub message: String,
    pub count: usize,
    pub table: Option<AttributeTable>,
}

/// Output for a one-shot chat message
#[derive(Debug, Serialize)]
pub struct ChatOutput {
    pub model: String,
    /// `replied`, `ignored` or `failed`
    pub outcome: &'static str,
    pub transcript: Vec<ChatTurn>,
}

/// One row of the config command
#[derive(Debug, Serialize)]
pub struct ConfigEntry {
    pub key: String,
    pub value: String,
    pub source: String,
}
