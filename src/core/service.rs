//! Service trait for per-collection data operations

use crate::core::entity::Entity;
use crate::core::id::RecordId;
use anyhow::Result;
use async_trait::async_trait;

/// Service trait for managing the records of one collection
///
/// Implementations provide CRUD operations for a specific entity type.
/// Callers are agnostic to the underlying storage mechanism; every
/// failure to reach or use the store is an `Err`, while "no such record"
/// is expressed with `Option`.
#[async_trait]
pub trait DataService<T: Entity>: Send + Sync {
    /// Insert a new record
    async fn create(&self, entity: T) -> Result<T>;

    /// Fetch a record by id
    async fn get(&self, id: &RecordId) -> Result<Option<T>>;

    /// Whether a record with this id exists
    async fn exists(&self, id: &RecordId) -> Result<bool> {
        Ok(self.get(id).await?.is_some())
    }

    /// List all records, newest first
    async fn list(&self) -> Result<Vec<T>>;

    /// Replace an existing record
    ///
    /// Returns `None` when no record has this id.
    async fn update(&self, id: &RecordId, entity: T) -> Result<Option<T>>;

    /// Remove a record, returning what was stored
    async fn delete(&self, id: &RecordId) -> Result<Option<T>>;

    /// Records whose top-level `field` equals `value` as a string
    async fn search(&self, field: &str, value: &str) -> Result<Vec<T>>;

    /// First record whose `field` equals `value`
    async fn find_one_by(&self, field: &str, value: &str) -> Result<Option<T>> {
        Ok(self.search(field, value).await?.into_iter().next())
    }
}
