//! Truck entity module

pub mod descriptor;
pub mod handlers;
pub mod model;
pub mod service;

pub use descriptor::TruckDescriptor;
pub use handlers::TruckAppState;
pub use model::{CreateTruck, Truck, UpdateTruck};
pub use service::TruckService;
