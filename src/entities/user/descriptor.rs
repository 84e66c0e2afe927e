//! Entity descriptor for User

use super::handlers::{
    UserAppState, create_user, delete_user, get_user, list_users, login, register, update_user,
};
use crate::server::entity_registry::EntityDescriptor;
use axum::{
    Router,
    routing::{get, post},
};

/// Descriptor for the User entity, including the auth routes
pub struct UserDescriptor {
    pub state: UserAppState,
}

impl UserDescriptor {
    pub fn new(state: UserAppState) -> Self {
        Self { state }
    }
}

impl EntityDescriptor for UserDescriptor {
    fn entity_type(&self) -> &str {
        "user"
    }

    fn plural(&self) -> &str {
        "users"
    }

    fn build_routes(&self) -> Router {
        Router::new()
            .route("/auth/register", post(register))
            .route("/auth/login", post(login))
            .route("/users", get(list_users).post(create_user))
            .route(
                "/users/{id}",
                get(get_user).put(update_user).delete(delete_user),
            )
            .with_state(self.state.clone())
    }
}
