//! User entity model and request payloads

use crate::core::id::RecordId;
use crate::core::validation::{Normalize, filters};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

crate::impl_record_entity!(User, "user", "users", unique = ["email"], {
    name: String,
    /// Always stored lowercase
    email: String,
    /// bcrypt hash, never exposed
    password_hash: String,
});

/// The externally visible part of a user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: RecordId,
    pub name: String,
    pub email: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Registration payload
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterUser {
    #[validate(length(min = 2, max = 100, message = "name must be 2 to 100 characters"))]
    pub name: String,
    #[validate(email(message = "email must be a valid address"))]
    pub email: String,
    #[validate(length(min = 6, message = "password must be at least 6 characters"))]
    pub password: String,
}

impl Normalize for RegisterUser {
    fn normalize(&mut self) {
        filters::apply(&mut self.name, &[filters::trim]);
        filters::apply(&mut self.email, &[filters::trim, filters::lowercase]);
    }
}

/// Login payload
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "email must be a valid address"))]
    pub email: String,
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

impl Normalize for LoginRequest {
    fn normalize(&mut self) {
        filters::apply(&mut self.email, &[filters::trim, filters::lowercase]);
    }
}

/// Successful login
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserProfile,
}

/// Partial user update; at least one field
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[validate(schema(function = "validate_user_update"))]
pub struct UpdateUser {
    #[validate(length(min = 2, max = 100, message = "name must be 2 to 100 characters"))]
    pub name: Option<String>,
    #[validate(email(message = "email must be a valid address"))]
    pub email: Option<String>,
    #[validate(length(min = 6, message = "password must be at least 6 characters"))]
    pub password: Option<String>,
}

impl Normalize for UpdateUser {
    fn normalize(&mut self) {
        filters::apply_opt(&mut self.name, &[filters::trim]);
        filters::apply_opt(&mut self.email, &[filters::trim, filters::lowercase]);
    }
}

fn validate_user_update(update: &UpdateUser) -> Result<(), validator::ValidationError> {
    if update.name.is_none() && update.email.is_none() && update.password.is_none() {
        return Err(validator::ValidationError::new("empty_update")
            .with_message("at least one field must be provided to update the user".into()));
    }
    Ok(())
}
