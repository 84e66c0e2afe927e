//! Macro-generated test suite for the `DataService<T>` contract.
//!
//! The `data_service_tests!` macro generates a test module that validates
//! the per-collection services of a `Repositories` bundle: CRUD, newest-first
//! listing, field search, unique fields and concurrent access.
//!
//! # Usage
//!
//! ```rust,ignore
//! #[macro_use]
//! mod storage_harness;
//!
//! use storage_harness::*;
//!
//! data_service_tests!(Repositories::in_memory());
//! ```

/// Generate a `DataService` conformance suite.
///
/// `$factory` must evaluate to a fresh `Repositories`; it is re-evaluated
/// for each test.
#[macro_export]
macro_rules! data_service_tests {
    ($factory:expr) => {
        mod data_service_contract_tests {
            use super::*;
            use chrono::Duration;
            use logistics::core::entity::Entity;
            use logistics::core::error::{EntityError, LogisticsError};
            use logistics::core::id::RecordId;
            use logistics::core::service::DataService;

            // ==================================================================
            // CRUD
            // ==================================================================

            #[tokio::test]
            async fn test_create_and_get() {
                let repos = $factory;
                let created = repos
                    .users
                    .create(user("Ana", "ana@example.com"))
                    .await
                    .unwrap();

                let fetched = repos.users.get(&created.id).await.unwrap().unwrap();
                assert_eq!(fetched, created);
                assert_eq!(fetched.created_at(), created.created_at);
            }

            #[tokio::test]
            async fn test_get_nonexistent() {
                let repos = $factory;
                assert!(repos.trucks.get(&RecordId::new()).await.unwrap().is_none());
                assert!(!repos.trucks.exists(&RecordId::nil()).await.unwrap());
            }

            #[tokio::test]
            async fn test_exists_after_create() {
                let repos = $factory;
                let place = repos
                    .locations
                    .create(location("place-1", "Somewhere 1"))
                    .await
                    .unwrap();
                assert!(repos.locations.exists(&place.id).await.unwrap());
                // Same id, other collection
                assert!(!repos.users.exists(&place.id).await.unwrap());
            }

            #[tokio::test]
            async fn test_list_empty() {
                let repos = $factory;
                assert!(repos.orders.list().await.unwrap().is_empty());
            }

            #[tokio::test]
            async fn test_list_newest_first() {
                let repos = $factory;
                let owner = RecordId::new();
                for (plates, minutes_ago) in [("OLD0001", 30), ("NEW0001", 0), ("MID0001", 10)] {
                    let mut record = truck(plates, owner);
                    record.created_at -= Duration::minutes(minutes_ago);
                    repos.trucks.create(record).await.unwrap();
                }

                let plates: Vec<_> = repos
                    .trucks
                    .list()
                    .await
                    .unwrap()
                    .into_iter()
                    .map(|t| t.plates)
                    .collect();
                assert_eq!(plates, vec!["NEW0001", "MID0001", "OLD0001"]);
            }

            #[tokio::test]
            async fn test_update_existing() {
                let repos = $factory;
                let mut record = repos
                    .trucks
                    .create(truck("ABC1234", RecordId::new()))
                    .await
                    .unwrap();

                record.color = "blue".to_string();
                record.touch();
                let updated = repos
                    .trucks
                    .update(&record.id, record.clone())
                    .await
                    .unwrap()
                    .unwrap();
                assert_eq!(updated.color, "blue");

                let fetched = repos.trucks.get(&record.id).await.unwrap().unwrap();
                assert_eq!(fetched.color, "blue");
                assert_eq!(fetched.updated_at, record.updated_at);
            }

            #[tokio::test]
            async fn test_update_nonexistent() {
                let repos = $factory;
                let ghost = truck("GHOST01", RecordId::new());
                let result = repos.trucks.update(&ghost.id, ghost.clone()).await.unwrap();
                assert!(result.is_none());
                assert!(repos.trucks.get(&ghost.id).await.unwrap().is_none());
            }

            #[tokio::test]
            async fn test_delete_existing() {
                let repos = $factory;
                let created = repos
                    .users
                    .create(user("Bea", "bea@example.com"))
                    .await
                    .unwrap();

                let deleted = repos.users.delete(&created.id).await.unwrap().unwrap();
                assert_eq!(deleted.email, "bea@example.com");
                assert!(repos.users.get(&created.id).await.unwrap().is_none());
            }

            #[tokio::test]
            async fn test_delete_nonexistent() {
                let repos = $factory;
                assert!(repos.users.delete(&RecordId::new()).await.unwrap().is_none());
            }

            // ==================================================================
            // Search
            // ==================================================================

            #[tokio::test]
            async fn test_search_string_field() {
                let repos = $factory;
                repos
                    .users
                    .create(user("Ana", "ana@example.com"))
                    .await
                    .unwrap();
                repos
                    .users
                    .create(user("Bob", "bob@example.com"))
                    .await
                    .unwrap();

                let found = repos.users.search("email", "bob@example.com").await.unwrap();
                assert_eq!(found.len(), 1);
                assert_eq!(found[0].name, "Bob");

                let first = repos.users.find_one_by("email", "ana@example.com").await.unwrap();
                assert_eq!(first.map(|u| u.name).as_deref(), Some("Ana"));
            }

            #[tokio::test]
            async fn test_search_reference_field() {
                let repos = $factory;
                let owner = RecordId::new();
                repos.trucks.create(truck("AAA1111", owner)).await.unwrap();
                repos.trucks.create(truck("BBB2222", owner)).await.unwrap();
                repos
                    .trucks
                    .create(truck("CCC3333", RecordId::new()))
                    .await
                    .unwrap();

                let owned = repos.trucks.search("user", &owner.to_hex()).await.unwrap();
                assert_eq!(owned.len(), 2);
            }

            #[tokio::test]
            async fn test_search_no_results() {
                let repos = $factory;
                repos
                    .users
                    .create(user("Ana", "ana@example.com"))
                    .await
                    .unwrap();
                assert!(repos.users.search("email", "nobody@example.com").await.unwrap().is_empty());
                assert!(repos.users.search("nickname", "ana").await.unwrap().is_empty());
            }

            // ==================================================================
            // Unique fields
            // ==================================================================

            #[tokio::test]
            async fn test_duplicate_unique_value_conflicts_on_create() {
                let repos = $factory;
                repos
                    .users
                    .create(user("Ana", "ana@example.com"))
                    .await
                    .unwrap();

                let err = repos
                    .users
                    .create(user("Other", "ana@example.com"))
                    .await
                    .unwrap_err();
                match LogisticsError::from(err) {
                    LogisticsError::Entity(EntityError::AlreadyExists { entity_type, field, value }) => {
                        assert_eq!(entity_type, "User");
                        assert_eq!(field, "email");
                        assert_eq!(value, "ana@example.com");
                    }
                    other => panic!("expected AlreadyExists, got {other:?}"),
                }

                repos.locations.create(location("place-1", "A")).await.unwrap();
                let err = repos
                    .locations
                    .create(location("place-1", "B"))
                    .await
                    .unwrap_err();
                assert_eq!(LogisticsError::from(err).error_code(), "ENTITY_ALREADY_EXISTS");

                assert_eq!(repos.users.list().await.unwrap().len(), 1);
                assert_eq!(repos.locations.list().await.unwrap().len(), 1);
            }

            #[tokio::test]
            async fn test_duplicate_unique_value_conflicts_on_update() {
                let repos = $factory;
                let owner = RecordId::new();
                repos.trucks.create(truck("AAA1111", owner)).await.unwrap();
                let second = repos.trucks.create(truck("BBB2222", owner)).await.unwrap();

                let mut clash = second.clone();
                clash.plates = "AAA1111".to_string();
                let err = repos.trucks.update(&second.id, clash).await.unwrap_err();
                let err = LogisticsError::from(err);
                assert_eq!(err.error_code(), "ENTITY_ALREADY_EXISTS");
                assert_eq!(err.to_string(), "Truck with plates 'AAA1111' already exists");

                let stored = repos.trucks.get(&second.id).await.unwrap().unwrap();
                assert_eq!(stored.plates, "BBB2222");
            }

            // ==================================================================
            // Concurrency
            // ==================================================================

            #[tokio::test]
            async fn test_concurrent_access() {
                let repos = $factory;
                let mut handles = Vec::new();
                for i in 0..10 {
                    let users = repos.users.clone();
                    handles.push(tokio::spawn(async move {
                        users
                            .create(user(&format!("User {i}"), &format!("user{i}@example.com")))
                            .await
                            .unwrap()
                    }));
                }
                for handle in handles {
                    handle.await.unwrap();
                }

                assert_eq!(repos.users.list().await.unwrap().len(), 10);
            }
        }
    };
}
