use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use siteplan_core::models::{DrawnShape, SessionId};

use crate::dto::{MessageRequest, MessageResponse, SelectionView, SessionView, ShapeRequest};
use crate::error::ApiError;
use crate::services::SessionService;
use crate::state::AppState;

pub async fn create_session(
    State(state): State<Arc<AppState>>,
) -> Result<(StatusCode, Json<SessionView>), ApiError> {
    let handle = state.sessions.create(&state.greeting).await?;
    let context = handle.lock().await;

    tracing::info!(session = %context.id, "Session started");

    Ok((StatusCode::CREATED, Json(SessionService::view(&state, &context))))
}

pub async fn get_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<SessionId>,
) -> Result<Json<SessionView>, ApiError> {
    let handle = state.sessions.get(id).await?;
    let context = handle.lock().await;

    Ok(Json(SessionService::view(&state, &context)))
}

pub async fn delete_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<SessionId>,
) -> Result<StatusCode, ApiError> {
    state.sessions.remove(id).await?;
    tracing::info!(session = %id, "Session ended");

    Ok(StatusCode::NO_CONTENT)
}

pub async fn put_shape(
    State(state): State<Arc<AppState>>,
    Path(id): Path<SessionId>,
    Json(request): Json<ShapeRequest>,
) -> Result<Json<SessionView>, ApiError> {
    let geometry = request.geometry().ok_or_else(|| {
        ApiError::bad_request("Invalid shape").with_details("Expected a GeoJSON geometry or Feature")
    })?;

    let shape = DrawnShape::new(request.kind, geometry)?;

    Ok(Json(SessionService::record_shape(&state, id, shape).await?))
}

pub async fn post_message(
    State(state): State<Arc<AppState>>,
    Path(id): Path<SessionId>,
    Json(request): Json<MessageRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    Ok(Json(SessionService::submit_message(&state, id, &request.text).await?))
}

pub async fn get_selection(
    State(state): State<Arc<AppState>>,
    Path(id): Path<SessionId>,
) -> Result<Json<SelectionView>, ApiError> {
    let handle = state.sessions.get(id).await?;
    let context = handle.lock().await;

    Ok(Json(SessionService::selection(&state, &context).into()))
}
