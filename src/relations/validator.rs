//! Existence checks for references held by orders and trucks
//!
//! Before a write, every reference a record names must resolve to an
//! existing record. The checks for one call are issued concurrently and
//! all of them are awaited; none is cancelled when a sibling fails. The
//! outcome is then reported in a fixed field order (user, truck, pickup,
//! dropoff) so the same payload always yields the same error.
//!
//! The checks are point-in-time reads. A referenced record deleted between
//! the check and the write goes unnoticed.

use crate::core::entity::Entity;
use crate::core::error::{LogisticsError, LogisticsResult, ReferenceError};
use crate::core::id::RecordId;
use crate::core::reference::{EntityKind, ReferenceField};
use crate::core::service::DataService;
use crate::entities::location::Location;
use crate::entities::truck::Truck;
use crate::entities::user::User;
use futures::future::join_all;
use std::sync::Arc;

/// One reference to check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reference {
    pub field: ReferenceField,
    pub id: RecordId,
}

impl Reference {
    pub fn new(field: ReferenceField, id: RecordId) -> Self {
        Self { field, id }
    }
}

/// The four references an order may carry; absent ones are not checked
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OrderReferences {
    pub user: Option<RecordId>,
    pub truck: Option<RecordId>,
    pub pickup: Option<RecordId>,
    pub dropoff: Option<RecordId>,
}

impl OrderReferences {
    /// Present references, in report order
    pub fn references(&self) -> Vec<Reference> {
        [
            (ReferenceField::User, self.user),
            (ReferenceField::Truck, self.truck),
            (ReferenceField::Pickup, self.pickup),
            (ReferenceField::Dropoff, self.dropoff),
        ]
        .into_iter()
        .filter_map(|(field, id)| id.map(|id| Reference::new(field, id)))
        .collect()
    }
}

/// Confirms references resolve, using explicit collection handles
#[derive(Clone)]
pub struct RelationValidator {
    users: Arc<dyn DataService<User>>,
    trucks: Arc<dyn DataService<Truck>>,
    locations: Arc<dyn DataService<Location>>,
}

impl RelationValidator {
    pub fn new(
        users: Arc<dyn DataService<User>>,
        trucks: Arc<dyn DataService<Truck>>,
        locations: Arc<dyn DataService<Location>>,
    ) -> Self {
        Self {
            users,
            trucks,
            locations,
        }
    }

    /// Check the order references that are present
    pub async fn validate_order_references(&self, refs: &OrderReferences) -> LogisticsResult<()> {
        self.validate(&refs.references()).await
    }

    /// Check every reference concurrently
    ///
    /// A store failure on any lookup is reported before any missing record,
    /// since a failed lookup says nothing about existence.
    pub async fn validate(&self, refs: &[Reference]) -> LogisticsResult<()> {
        let mut outcomes = join_all(refs.iter().map(|r| self.check(*r))).await;
        outcomes.sort_by_key(|(reference, _)| reference.field);

        let mut missing = None;
        for (reference, outcome) in outcomes {
            match outcome {
                Err(e) => return Err(LogisticsError::from(e)),
                Ok(false) if missing.is_none() => missing = Some(reference),
                Ok(_) => {}
            }
        }

        match missing {
            Some(reference) => Err(ReferenceError::not_found(reference.field, reference.id).into()),
            None => Ok(()),
        }
    }

    async fn check(&self, reference: Reference) -> (Reference, anyhow::Result<bool>) {
        let id = &reference.id;
        let outcome = match reference.field.kind() {
            EntityKind::User => self.users.exists(id).await,
            EntityKind::Truck => self.trucks.exists(id).await,
            EntityKind::Location => self.locations.exists(id).await,
        };
        (reference, outcome)
    }

    /// Collection name a reference field points into
    pub fn collection_for(field: ReferenceField) -> &'static str {
        match field.kind() {
            EntityKind::User => User::resource_name(),
            EntityKind::Truck => Truck::resource_name(),
            EntityKind::Location => Location::resource_name(),
        }
    }
}
