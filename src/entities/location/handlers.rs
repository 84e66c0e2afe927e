//! Location HTTP handlers

use super::model::{Location, LocationRequest};
use super::service::LocationService;
use crate::core::auth::{RequireAuth, TokenIssuer};
use crate::core::error::LogisticsError;
use crate::core::id::RecordId;
use crate::core::validation::ValidatedJson;
use axum::{
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::Json,
};
use std::sync::Arc;

/// Location-specific AppState
#[derive(Clone, FromRef)]
pub struct LocationAppState {
    pub service: LocationService,
    pub tokens: Arc<TokenIssuer>,
}

pub async fn list_locations(
    _auth: RequireAuth,
    State(state): State<LocationAppState>,
) -> Result<Json<Vec<Location>>, LogisticsError> {
    state.service.list().await.map(Json)
}

pub async fn get_location(
    _auth: RequireAuth,
    State(state): State<LocationAppState>,
    Path(id): Path<String>,
) -> Result<Json<Location>, LogisticsError> {
    let id: RecordId = id.parse()?;
    state.service.get(&id).await.map(Json)
}

pub async fn create_location(
    _auth: RequireAuth,
    State(state): State<LocationAppState>,
    ValidatedJson(payload): ValidatedJson<LocationRequest>,
) -> Result<(StatusCode, Json<Location>), LogisticsError> {
    let location = state.service.create(payload).await?;
    Ok((StatusCode::CREATED, Json(location)))
}

pub async fn update_location(
    _auth: RequireAuth,
    State(state): State<LocationAppState>,
    Path(id): Path<String>,
    ValidatedJson(payload): ValidatedJson<LocationRequest>,
) -> Result<Json<Location>, LogisticsError> {
    let id: RecordId = id.parse()?;
    state.service.update(&id, payload).await.map(Json)
}

pub async fn delete_location(
    _auth: RequireAuth,
    State(state): State<LocationAppState>,
    Path(id): Path<String>,
) -> Result<Json<Location>, LogisticsError> {
    let id: RecordId = id.parse()?;
    state.service.delete(&id).await.map(Json)
}
