//! REST API exposure
//!
//! Consumes a `ServerHost` and produces an Axum `Router`: health checks at
//! the root and every entity route under `/api`.

use super::super::host::ServerHost;
use axum::{Json, Router, routing::get};
use serde_json::{Value, json};
use std::sync::Arc;

/// Prefix every entity route is nested under
pub const API_PREFIX: &str = "/api";

const SERVICE_NAME: &str = "logistics-rs";

pub struct RestExposure;

impl RestExposure {
    /// Build the REST router from a host
    ///
    /// Returns a router with:
    /// - `/health` and `/healthz`
    /// - entity routes nested under `/api`
    pub fn build_router(host: Arc<ServerHost>) -> Router {
        let entity_routes = host.entity_registry.build_routes();

        Self::health_routes().nest(API_PREFIX, entity_routes)
    }

    fn health_routes() -> Router {
        Router::new()
            .route("/health", get(Self::health_check))
            .route("/healthz", get(Self::health_check))
    }

    async fn health_check() -> Json<Value> {
        Json(json!({
            "status": "ok",
            "service": SERVICE_NAME
        }))
    }
}
