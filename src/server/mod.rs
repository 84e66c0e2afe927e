//! HTTP server assembly
//!
//! [`ServerBuilder`] wires the storage backend into the entity services,
//! registers each entity's routes and exposes them over REST.

pub mod builder;
pub mod entity_registry;
pub mod exposure;
pub mod host;

pub use builder::ServerBuilder;
pub use entity_registry::{EntityDescriptor, EntityRegistry};
pub use exposure::RestExposure;
pub use host::ServerHost;
