//! Truck HTTP handlers

use super::model::{CreateTruck, Truck, UpdateTruck};
use super::service::TruckService;
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

/// Truck-specific AppState
#[derive(Clone, FromRef)]
pub struct TruckAppState {
    pub service: TruckService,
    pub tokens: Arc<TokenIssuer>,
}

pub async fn list_trucks(
    _auth: RequireAuth,
    State(state): State<TruckAppState>,
) -> Result<Json<Vec<Truck>>, LogisticsError> {
    state.service.list().await.map(Json)
}

pub async fn get_truck(
    _auth: RequireAuth,
    State(state): State<TruckAppState>,
    Path(id): Path<String>,
) -> Result<Json<Truck>, LogisticsError> {
    let id: RecordId = id.parse()?;
    state.service.get(&id).await.map(Json)
}

pub async fn create_truck(
    _auth: RequireAuth,
    State(state): State<TruckAppState>,
    ValidatedJson(payload): ValidatedJson<CreateTruck>,
) -> Result<(StatusCode, Json<Truck>), LogisticsError> {
    let truck = state.service.create(payload).await?;
    Ok((StatusCode::CREATED, Json(truck)))
}

pub async fn update_truck(
    _auth: RequireAuth,
    State(state): State<TruckAppState>,
    Path(id): Path<String>,
    ValidatedJson(payload): ValidatedJson<UpdateTruck>,
) -> Result<Json<Truck>, LogisticsError> {
    let id: RecordId = id.parse()?;
    state.service.update(&id, payload).await.map(Json)
}

pub async fn delete_truck(
    _auth: RequireAuth,
    State(state): State<TruckAppState>,
    Path(id): Path<String>,
) -> Result<Json<Truck>, LogisticsError> {
    let id: RecordId = id.parse()?;
    state.service.delete(&id).await.map(Json)
}
