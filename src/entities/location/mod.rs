//! Location entity module

pub mod descriptor;
pub mod handlers;
pub mod model;
pub mod service;

pub use descriptor::LocationDescriptor;
pub use handlers::LocationAppState;
pub use model::{Location, LocationRequest};
pub use service::LocationService;
