//! Entity trait defining the core abstraction for all stored records

use crate::core::id::RecordId;
use chrono::{DateTime, SubsecRound, Utc};

/// Current time at the millisecond precision every backend can store
pub fn timestamp() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

/// Base trait for all records kept in a collection.
///
/// Every entity has:
/// - id: Unique identifier, generated on creation
/// - createdAt: Creation timestamp
/// - updatedAt: Last modification timestamp
///
/// Implementations are generated by [`impl_record_entity!`](crate::impl_record_entity).
pub trait Entity: Clone + Send + Sync + 'static {
    /// The collection name (e.g., "users", "trucks")
    fn resource_name() -> &'static str;

    /// The singular name (e.g., "user", "truck")
    fn resource_name_singular() -> &'static str;

    /// Get the unique identifier for this entity instance
    fn id(&self) -> RecordId;

    /// Get the creation timestamp
    fn created_at(&self) -> DateTime<Utc>;

    /// Get the last update timestamp
    fn updated_at(&self) -> DateTime<Utc>;

    /// Refresh the update timestamp
    fn touch(&mut self);

    /// Type name used in error messages (e.g., "User")
    fn type_name() -> &'static str {
        Self::resource_name_singular()
    }

    /// Fields whose values no two records in the collection may share
    fn unique_fields() -> &'static [&'static str] {
        &[]
    }
}
