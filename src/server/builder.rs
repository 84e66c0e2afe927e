//! ServerBuilder for assembling the HTTP application

use super::entity_registry::EntityRegistry;
use super::exposure::RestExposure;
use super::host::ServerHost;
use crate::config::AppConfig;
use crate::core::auth::{PasswordHasher, TokenIssuer};
use crate::entities::location::{LocationAppState, LocationDescriptor, LocationService};
use crate::entities::order::{OrderAppState, OrderDescriptor, OrderService};
use crate::entities::truck::{TruckAppState, TruckDescriptor, TruckService};
use crate::entities::user::{UserAppState, UserDescriptor, UserService};
use crate::places::{PlaceLookup, StaticPlaceLookup};
use crate::relations::{OrderReadPipeline, RelationValidator};
use crate::storage::Repositories;
use anyhow::Result;
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Builder wiring storage, services and routes together
///
/// # Example
///
/// ```ignore
/// let app = ServerBuilder::new()
///     .with_config(AppConfig::load()?)
///     .with_repositories(Repositories::mongodb(database))
///     .with_place_lookup(GooglePlacesClient::new(api_key))
///     .build();
/// ```
pub struct ServerBuilder {
    config: AppConfig,
    repositories: Option<Repositories>,
    places: Option<Arc<dyn PlaceLookup>>,
}

impl ServerBuilder {
    pub fn new() -> Self {
        Self {
            config: AppConfig::default(),
            repositories: None,
            places: None,
        }
    }

    pub fn with_config(mut self, config: AppConfig) -> Self {
        self.config = config;
        self
    }

    /// Storage backend; in-memory when not set
    pub fn with_repositories(mut self, repositories: Repositories) -> Self {
        self.repositories = Some(repositories);
        self
    }

    /// Place lookup; an empty static lookup when not set
    pub fn with_place_lookup(mut self, places: impl PlaceLookup + 'static) -> Self {
        self.places = Some(Arc::new(places));
        self
    }

    /// Build the services and register every entity
    pub fn build_host(self) -> ServerHost {
        let repos = self.repositories.unwrap_or_else(Repositories::in_memory);
        let places: Arc<dyn PlaceLookup> = match self.places {
            Some(places) => places,
            None => Arc::new(StaticPlaceLookup::new()),
        };
        let tokens = Arc::new(TokenIssuer::new(
            &self.config.auth.jwt_secret,
            self.config.token_ttl(),
        ));
        let hasher = PasswordHasher::new(self.config.auth.bcrypt_cost);

        let relations = RelationValidator::new(
            repos.users.clone(),
            repos.trucks.clone(),
            repos.locations.clone(),
        );

        let mut registry = EntityRegistry::new();
        registry.register(Box::new(UserDescriptor::new(UserAppState {
            service: UserService::new(repos.users.clone(), hasher, tokens.clone()),
            tokens: tokens.clone(),
        })));
        registry.register(Box::new(TruckDescriptor::new(TruckAppState {
            service: TruckService::new(repos.trucks.clone(), relations.clone()),
            tokens: tokens.clone(),
        })));
        registry.register(Box::new(LocationDescriptor::new(LocationAppState {
            service: LocationService::new(repos.locations.clone(), places),
            tokens: tokens.clone(),
        })));
        registry.register(Box::new(OrderDescriptor::new(OrderAppState {
            service: OrderService::new(
                repos.orders.clone(),
                relations,
                OrderReadPipeline::new(repos.pipeline.clone()),
            ),
            tokens,
            pagination: self.config.pagination_policy(),
        })));

        ServerHost::new(self.config, registry)
    }

    /// Build the final REST router with tracing and CORS
    pub fn build(self) -> Router {
        let host = Arc::new(self.build_host());
        tracing::debug!(entities = ?host.entity_types(), "routes registered");

        RestExposure::build_router(host).layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
    }

    /// Serve the application with graceful shutdown
    ///
    /// Binds the configured address and stops on SIGTERM or Ctrl+C.
    pub async fn serve(self) -> Result<()> {
        let addr = self.config.bind_address();
        let app = self.build();
        let listener = TcpListener::bind(&addr).await?;

        tracing::info!("Server listening on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Wait for SIGTERM or SIGINT
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal, initiating graceful shutdown...");
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_registers_all_entities() {
        let host = ServerBuilder::new().build_host();
        assert_eq!(
            host.entity_types(),
            vec!["location", "order", "truck", "user"]
        );
    }

    #[test]
    fn test_config_is_kept() {
        let mut config = AppConfig::default();
        config.server.port = 4321;
        let host = ServerBuilder::new().with_config(config).build_host();
        assert_eq!(host.config.server.port, 4321);
    }
}
