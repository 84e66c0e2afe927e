//! Order entity module

pub mod descriptor;
pub mod handlers;
pub mod model;
pub mod service;

pub use descriptor::OrderDescriptor;
pub use handlers::OrderAppState;
pub use model::{CreateOrder, Order, OrderStatus, OrderView, UnknownStatus, UpdateOrder};
pub use service::OrderService;
