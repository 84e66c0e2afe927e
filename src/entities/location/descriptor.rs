//! Entity descriptor for Location

use super::handlers::{
    LocationAppState, create_location, delete_location, get_location, list_locations,
    update_location,
};
use crate::server::entity_registry::EntityDescriptor;
use axum::{Router, routing::get};

/// Descriptor for the Location entity
pub struct LocationDescriptor {
    pub state: LocationAppState,
}

impl LocationDescriptor {
    pub fn new(state: LocationAppState) -> Self {
        Self { state }
    }
}

impl EntityDescriptor for LocationDescriptor {
    fn entity_type(&self) -> &str {
        "location"
    }

    fn plural(&self) -> &str {
        "locations"
    }

    fn build_routes(&self) -> Router {
        Router::new()
            .route("/locations", get(list_locations).post(create_location))
            .route(
                "/locations/{id}",
                get(get_location).put(update_location).delete(delete_location),
            )
            .with_state(self.state.clone())
    }
}
