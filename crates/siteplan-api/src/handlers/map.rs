use std::sync::Arc;

use axum::{
    extract::State,
    response::{IntoResponse, Response},
    Json,
};

use crate::state::AppState;

/// Basemap settings, footprint layer, style and draw control
pub async fn get_map(State(state): State<Arc<AppState>>) -> Response {
    Json(state.widget.as_ref()).into_response()
}

/// The footprint layer alone, as a GeoJSON FeatureCollection
pub async fn get_features(State(state): State<Arc<AppState>>) -> Response {
    Json(state.collection.to_geojson()).into_response()
}
