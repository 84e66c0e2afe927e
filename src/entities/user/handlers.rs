//! User HTTP handlers

use super::model::{LoginRequest, LoginResponse, RegisterUser, UpdateUser, UserProfile};
use super::service::UserService;
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

/// User-specific AppState
#[derive(Clone, FromRef)]
pub struct UserAppState {
    pub service: UserService,
    pub tokens: Arc<TokenIssuer>,
}

pub async fn register(
    State(state): State<UserAppState>,
    ValidatedJson(payload): ValidatedJson<RegisterUser>,
) -> Result<(StatusCode, Json<UserProfile>), LogisticsError> {
    let user = state.service.register(payload).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn login(
    State(state): State<UserAppState>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> Result<Json<LoginResponse>, LogisticsError> {
    state.service.login(payload).await.map(Json)
}

pub async fn list_users(
    _auth: RequireAuth,
    State(state): State<UserAppState>,
) -> Result<Json<Vec<UserProfile>>, LogisticsError> {
    state.service.list().await.map(Json)
}

pub async fn create_user(
    _auth: RequireAuth,
    State(state): State<UserAppState>,
    ValidatedJson(payload): ValidatedJson<RegisterUser>,
) -> Result<(StatusCode, Json<UserProfile>), LogisticsError> {
    let user = state.service.register(payload).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn get_user(
    _auth: RequireAuth,
    State(state): State<UserAppState>,
    Path(id): Path<String>,
) -> Result<Json<UserProfile>, LogisticsError> {
    let id: RecordId = id.parse()?;
    state.service.get(&id).await.map(Json)
}

pub async fn update_user(
    _auth: RequireAuth,
    State(state): State<UserAppState>,
    Path(id): Path<String>,
    ValidatedJson(payload): ValidatedJson<UpdateUser>,
) -> Result<Json<UserProfile>, LogisticsError> {
    let id: RecordId = id.parse()?;
    state.service.update(&id, payload).await.map(Json)
}

pub async fn delete_user(
    _auth: RequireAuth,
    State(state): State<UserAppState>,
    Path(id): Path<String>,
) -> Result<Json<UserProfile>, LogisticsError> {
    let id: RecordId = id.parse()?;
    state.service.delete(&id).await.map(Json)
}
