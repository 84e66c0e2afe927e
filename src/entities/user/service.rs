//! User registration, login and maintenance

use super::model::{LoginRequest, LoginResponse, RegisterUser, UpdateUser, User, UserProfile};
use crate::core::auth::{PasswordHasher, TokenIssuer};
use crate::core::entity::Entity;
use crate::core::error::{EntityError, LogisticsResult, RequestError};
use crate::core::id::RecordId;
use crate::core::service::DataService;
use std::sync::Arc;

const INVALID_CREDENTIALS: &str = "invalid email or password";

/// User operations over the users collection
#[derive(Clone)]
pub struct UserService {
    store: Arc<dyn DataService<User>>,
    hasher: PasswordHasher,
    tokens: Arc<TokenIssuer>,
}

impl UserService {
    pub fn new(
        store: Arc<dyn DataService<User>>,
        hasher: PasswordHasher,
        tokens: Arc<TokenIssuer>,
    ) -> Self {
        Self {
            store,
            hasher,
            tokens,
        }
    }

    /// Create a user after checking the email is free
    pub async fn register(&self, payload: RegisterUser) -> LogisticsResult<UserProfile> {
        if self.store.find_one_by("email", &payload.email).await?.is_some() {
            return Err(EntityError::already_exists("User", "email", &payload.email).into());
        }

        let password_hash = self.hasher.hash(&payload.password).await?;
        let user = self
            .store
            .create(User::new(payload.name, payload.email, password_hash))
            .await?;

        tracing::info!(user_id = %user.id, "user registered");
        Ok(user.into())
    }

    /// Check credentials and issue a token
    ///
    /// Unknown email and wrong password are indistinguishable to the caller.
    pub async fn login(&self, payload: LoginRequest) -> LogisticsResult<LoginResponse> {
        let user = match self.store.find_one_by("email", &payload.email).await? {
            Some(user) if self.hasher.verify(&payload.password, &user.password_hash).await? => user,
            _ => return Err(RequestError::unauthorized(INVALID_CREDENTIALS).into()),
        };

        let token = self.tokens.issue(user.id, &user.name, &user.email)?;
        tracing::info!(user_id = %user.id, "user logged in");

        Ok(LoginResponse {
            token,
            user: user.into(),
        })
    }

    pub async fn list(&self) -> LogisticsResult<Vec<UserProfile>> {
        let users = self.store.list().await?;
        tracing::debug!(count = users.len(), "listed users");
        Ok(users.into_iter().map(UserProfile::from).collect())
    }

    pub async fn get(&self, id: &RecordId) -> LogisticsResult<UserProfile> {
        self.find(id).await.map(UserProfile::from)
    }

    /// Apply a partial update; a new email must not belong to another user
    pub async fn update(&self, id: &RecordId, payload: UpdateUser) -> LogisticsResult<UserProfile> {
        let mut user = self.find(id).await?;

        if let Some(email) = payload.email {
            if email != user.email
                && let Some(other) = self.store.find_one_by("email", &email).await?
                && other.id != user.id
            {
                return Err(EntityError::already_exists("User", "email", &email).into());
            }
            user.email = email;
        }
        if let Some(name) = payload.name {
            user.name = name;
        }
        if let Some(password) = payload.password {
            user.password_hash = self.hasher.hash(&password).await?;
        }
        user.touch();

        let updated = self
            .store
            .update(id, user)
            .await?
            .ok_or_else(|| EntityError::not_found("User", *id))?;

        tracing::info!(user_id = %id, "user updated");
        Ok(updated.into())
    }

    pub async fn delete(&self, id: &RecordId) -> LogisticsResult<UserProfile> {
        let user = self
            .store
            .delete(id)
            .await?
            .ok_or_else(|| EntityError::not_found("User", *id))?;

        tracing::info!(user_id = %id, "user deleted");
        Ok(user.into())
    }

    async fn find(&self, id: &RecordId) -> LogisticsResult<User> {
        tracing::debug!(user_id = %id, "fetching user");
        self.store
            .get(id)
            .await?
            .ok_or_else(|| EntityError::not_found("User", *id).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::LogisticsError;
    use crate::storage::in_memory::InMemoryDatabase;
    use chrono::Duration;

    fn service() -> UserService {
        let db = InMemoryDatabase::new();
        UserService::new(
            Arc::new(db.service::<User>()),
            PasswordHasher::new(4),
            Arc::new(TokenIssuer::new("test-secret", Duration::minutes(30))),
        )
    }

    fn register(name: &str, email: &str) -> RegisterUser {
        RegisterUser {
            name: name.to_string(),
            email: email.to_string(),
            password: "secret1".to_string(),
        }
    }

    #[tokio::test]
    async fn test_register_then_login() {
        let users = service();
        let profile = users.register(register("Ana", "ana@example.com")).await.unwrap();

        let login = users
            .login(LoginRequest {
                email: "ana@example.com".to_string(),
                password: "secret1".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(login.user.id, profile.id);
        assert!(!login.token.is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_email_conflicts() {
        let users = service();
        users.register(register("Ana", "ana@example.com")).await.unwrap();

        let err = users
            .register(register("Other", "ana@example.com"))
            .await
            .unwrap_err();
        assert_eq!(err.error_code(), "ENTITY_ALREADY_EXISTS");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_registrations_store_one_user() {
        let users = service();

        let handles: Vec<_> = (0..16)
            .map(|i| {
                let users = users.clone();
                tokio::spawn(async move {
                    users
                        .register(register(&format!("Ana {i}"), "ana@example.com"))
                        .await
                })
            })
            .collect();

        let mut registered = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => registered += 1,
                Err(err) => assert_eq!(err.error_code(), "ENTITY_ALREADY_EXISTS"),
            }
        }

        assert_eq!(registered, 1);
        assert_eq!(users.store.search("email", "ana@example.com").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_wrong_password_and_unknown_email_look_the_same() {
        let users = service();
        users.register(register("Ana", "ana@example.com")).await.unwrap();

        let wrong = users
            .login(LoginRequest {
                email: "ana@example.com".to_string(),
                password: "nope".to_string(),
            })
            .await
            .unwrap_err();
        let unknown = users
            .login(LoginRequest {
                email: "bob@example.com".to_string(),
                password: "secret1".to_string(),
            })
            .await
            .unwrap_err();

        assert_eq!(wrong.to_string(), unknown.to_string());
        assert!(matches!(wrong, LogisticsError::Request(_)));
    }

    #[tokio::test]
    async fn test_update_email_taken_by_other_user() {
        let users = service();
        let ana = users.register(register("Ana", "ana@example.com")).await.unwrap();
        users.register(register("Bob", "bob@example.com")).await.unwrap();

        let err = users
            .update(
                &ana.id,
                UpdateUser {
                    email: Some("bob@example.com".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.error_code(), "ENTITY_ALREADY_EXISTS");

        // Keeping one's own email is not a conflict
        let same = users
            .update(
                &ana.id,
                UpdateUser {
                    email: Some("ana@example.com".to_string()),
                    name: Some("Ana Maria".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(same.name, "Ana Maria");
        assert!(same.updated_at >= same.created_at);
    }

    #[tokio::test]
    async fn test_password_change_rehashes() {
        let users = service();
        let ana = users.register(register("Ana", "ana@example.com")).await.unwrap();

        users
            .update(
                &ana.id,
                UpdateUser {
                    password: Some("another1".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let login = users
            .login(LoginRequest {
                email: "ana@example.com".to_string(),
                password: "another1".to_string(),
            })
            .await;
        assert!(login.is_ok());
    }

    #[tokio::test]
    async fn test_missing_user_is_not_found() {
        let users = service();
        let err = users.get(&RecordId::nil()).await.unwrap_err();
        assert_eq!(err.error_code(), "ENTITY_NOT_FOUND");

        let err = users.delete(&RecordId::nil()).await.unwrap_err();
        assert_eq!(err.error_code(), "ENTITY_NOT_FOUND");
    }
}
