//! User entity module

pub mod descriptor;
pub mod handlers;
pub mod model;
pub mod service;

pub use descriptor::UserDescriptor;
pub use handlers::UserAppState;
pub use model::{LoginRequest, LoginResponse, RegisterUser, UpdateUser, User, UserProfile};
pub use service::UserService;
