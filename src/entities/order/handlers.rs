//! Order HTTP handlers

use super::model::{CreateOrder, Order, OrderStatus, OrderView, UpdateOrder};
use super::service::OrderService;
use crate::core::auth::{RequireAuth, TokenIssuer};
use crate::core::error::{LogisticsError, ValidationError};
use crate::core::id::RecordId;
use crate::core::query::{ListQuery, PaginationPolicy};
use crate::core::validation::ValidatedJson;
use crate::relations::ListParams;
use axum::{
    extract::{FromRef, Path, Query, State},
    http::StatusCode,
    response::Json,
};
use std::sync::Arc;

/// Order-specific AppState
#[derive(Clone, FromRef)]
pub struct OrderAppState {
    pub service: OrderService,
    pub tokens: Arc<TokenIssuer>,
    pub pagination: PaginationPolicy,
}

impl OrderAppState {
    /// Turn raw query parameters into list parameters
    pub fn list_params(&self, query: &ListQuery) -> Result<ListParams, LogisticsError> {
        let pagination = query.pagination(&self.pagination)?;
        let status = query
            .status()
            .map(|raw| {
                raw.parse::<OrderStatus>()
                    .map_err(|e| ValidationError::InvalidQuery {
                        parameter: "status".to_string(),
                        value: raw.to_string(),
                        message: e.to_string(),
                    })
            })
            .transpose()?;

        Ok(ListParams { status, pagination })
    }
}

pub async fn list_orders(
    _auth: RequireAuth,
    State(state): State<OrderAppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<OrderView>>, LogisticsError> {
    let params = state.list_params(&query)?;
    state.service.list(&params).await.map(Json)
}

pub async fn get_order(
    _auth: RequireAuth,
    State(state): State<OrderAppState>,
    Path(id): Path<String>,
) -> Result<Json<OrderView>, LogisticsError> {
    let id: RecordId = id.parse()?;
    state.service.get(&id).await.map(Json)
}

pub async fn create_order(
    _auth: RequireAuth,
    State(state): State<OrderAppState>,
    ValidatedJson(payload): ValidatedJson<CreateOrder>,
) -> Result<(StatusCode, Json<Order>), LogisticsError> {
    let order = state.service.create(payload).await?;
    Ok((StatusCode::CREATED, Json(order)))
}

pub async fn update_order(
    _auth: RequireAuth,
    State(state): State<OrderAppState>,
    Path(id): Path<String>,
    ValidatedJson(payload): ValidatedJson<UpdateOrder>,
) -> Result<Json<Order>, LogisticsError> {
    let id: RecordId = id.parse()?;
    state.service.update(&id, payload).await.map(Json)
}

pub async fn delete_order(
    _auth: RequireAuth,
    State(state): State<OrderAppState>,
    Path(id): Path<String>,
) -> Result<Json<Order>, LogisticsError> {
    let id: RecordId = id.parse()?;
    state.service.delete(&id).await.map(Json)
}
