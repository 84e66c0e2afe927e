//! Entity descriptor for Truck

use super::handlers::{
    TruckAppState, create_truck, delete_truck, get_truck, list_trucks, update_truck,
};
use crate::server::entity_registry::EntityDescriptor;
use axum::{Router, routing::get};

/// Descriptor for the Truck entity
pub struct TruckDescriptor {
    pub state: TruckAppState,
}

impl TruckDescriptor {
    pub fn new(state: TruckAppState) -> Self {
        Self { state }
    }
}

impl EntityDescriptor for TruckDescriptor {
    fn entity_type(&self) -> &str {
        "truck"
    }

    fn plural(&self) -> &str {
        "trucks"
    }

    fn build_routes(&self) -> Router {
        Router::new()
            .route("/trucks", get(list_trucks).post(create_truck))
            .route(
                "/trucks/{id}",
                get(get_truck).put(update_truck).delete(delete_truck),
            )
            .with_state(self.state.clone())
    }
}
