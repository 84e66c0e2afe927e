//! Server host holding the assembled application state
//!
//! The host is what the REST exposure consumes: the configuration the
//! server was built with and the registry of entity routes.

use crate::config::AppConfig;
use crate::server::entity_registry::EntityRegistry;
use std::sync::Arc;

pub struct ServerHost {
    pub config: Arc<AppConfig>,
    pub entity_registry: EntityRegistry,
}

impl ServerHost {
    pub fn new(config: AppConfig, entity_registry: EntityRegistry) -> Self {
        Self {
            config: Arc::new(config),
            entity_registry,
        }
    }

    /// Registered entity types
    pub fn entity_types(&self) -> Vec<&str> {
        self.entity_registry.entity_types()
    }
}
