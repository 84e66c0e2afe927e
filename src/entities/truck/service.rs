//! Truck operations with plates uniqueness and owner checks

use super::model::{CreateTruck, Truck, UpdateTruck};
use crate::core::entity::Entity;
use crate::core::error::{EntityError, LogisticsResult};
use crate::core::id::RecordId;
use crate::core::reference::ReferenceField;
use crate::core::service::DataService;
use crate::relations::{Reference, RelationValidator};
use std::sync::Arc;

#[derive(Clone)]
pub struct TruckService {
    store: Arc<dyn DataService<Truck>>,
    relations: RelationValidator,
}

impl TruckService {
    pub fn new(store: Arc<dyn DataService<Truck>>, relations: RelationValidator) -> Self {
        Self { store, relations }
    }

    /// Plates conflict first, then the owner must exist
    pub async fn create(&self, payload: CreateTruck) -> LogisticsResult<Truck> {
        self.ensure_plates_free(&payload.plates, None).await?;
        self.relations
            .validate(&[Reference::new(ReferenceField::User, payload.user)])
            .await?;

        let truck = self
            .store
            .create(Truck::new(
                payload.year,
                payload.color,
                payload.plates,
                payload.user,
            ))
            .await?;

        tracing::info!(truck_id = %truck.id, plates = %truck.plates, "truck created");
        Ok(truck)
    }

    pub async fn list(&self) -> LogisticsResult<Vec<Truck>> {
        let trucks = self.store.list().await?;
        tracing::debug!(count = trucks.len(), "listed trucks");
        Ok(trucks)
    }

    pub async fn get(&self, id: &RecordId) -> LogisticsResult<Truck> {
        tracing::debug!(truck_id = %id, "fetching truck");
        self.store
            .get(id)
            .await?
            .ok_or_else(|| EntityError::not_found("Truck", *id).into())
    }

    /// Partial update; plates may only clash with other trucks
    pub async fn update(&self, id: &RecordId, payload: UpdateTruck) -> LogisticsResult<Truck> {
        let mut truck = self.get(id).await?;

        if let Some(plates) = &payload.plates {
            self.ensure_plates_free(plates, Some(id)).await?;
        }
        if let Some(user) = payload.user {
            self.relations
                .validate(&[Reference::new(ReferenceField::User, user)])
                .await?;
            truck.user = user;
        }
        if let Some(year) = payload.year {
            truck.year = year;
        }
        if let Some(color) = payload.color {
            truck.color = color;
        }
        if let Some(plates) = payload.plates {
            truck.plates = plates;
        }
        truck.touch();

        let updated = self
            .store
            .update(id, truck)
            .await?
            .ok_or_else(|| EntityError::not_found("Truck", *id))?;

        tracing::info!(truck_id = %id, "truck updated");
        Ok(updated)
    }

    pub async fn delete(&self, id: &RecordId) -> LogisticsResult<Truck> {
        let truck = self
            .store
            .delete(id)
            .await?
            .ok_or_else(|| EntityError::not_found("Truck", *id))?;

        tracing::info!(truck_id = %id, "truck deleted");
        Ok(truck)
    }

    async fn ensure_plates_free(&self, plates: &str, owner: Option<&RecordId>) -> LogisticsResult<()> {
        match self.store.find_one_by("plates", plates).await? {
            Some(existing) if Some(&existing.id) != owner => {
                Err(EntityError::already_exists("Truck", "plates", plates).into())
            }
            _ => Ok(()),
        }
    }
}
