//! Entity registry collecting the route sets of every entity

use axum::Router;
use std::collections::BTreeMap;

/// Trait that describes how to build routes for an entity
///
/// Each entity (User, Truck, Location, Order) implements this trait to
/// provide its routes, with its own state already applied.
pub trait EntityDescriptor: Send + Sync {
    /// The entity type name (singular, e.g., "order")
    fn entity_type(&self) -> &str;

    /// The plural form (e.g., "orders")
    fn plural(&self) -> &str;

    /// Build the routes for this entity, relative to the API root
    ///
    /// Typically:
    /// - GET/POST /{plural}
    /// - GET/PUT/DELETE /{plural}/{id}
    fn build_routes(&self) -> Router;
}

/// Registry for all entities exposed by the server
#[derive(Default)]
pub struct EntityRegistry {
    descriptors: BTreeMap<String, Box<dyn EntityDescriptor>>,
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an entity descriptor
    ///
    /// The entity type name is the key; registering it again replaces the
    /// earlier descriptor.
    pub fn register(&mut self, descriptor: Box<dyn EntityDescriptor>) {
        let entity_type = descriptor.entity_type().to_string();
        self.descriptors.insert(entity_type, descriptor);
    }

    /// Merge every entity's routes into one router
    pub fn build_routes(&self) -> Router {
        self.descriptors
            .values()
            .fold(Router::new(), |router, descriptor| {
                router.merge(descriptor.build_routes())
            })
    }

    /// Registered entity types, sorted
    pub fn entity_types(&self) -> Vec<&str> {
        self.descriptors.keys().map(String::as_str).collect()
    }

    /// Collection names of the registered entities
    pub fn plurals(&self) -> Vec<&str> {
        self.descriptors.values().map(|d| d.plural()).collect()
    }
}
