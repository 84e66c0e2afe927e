//! Stored records and their HTTP surface
//!
//! Each entity module holds its model, its service over the store, its
//! handlers and the descriptor that registers its routes.

pub mod location;
pub mod macros;
pub mod order;
pub mod truck;
pub mod user;

pub use location::Location;
pub use order::{Order, OrderStatus, OrderView};
pub use truck::Truck;
pub use user::{User, UserProfile};
