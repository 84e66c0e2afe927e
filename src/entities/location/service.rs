//! Location operations backed by the place lookup

use super::model::{Location, LocationRequest};
use crate::core::entity::Entity;
use crate::core::error::{EntityError, LogisticsResult};
use crate::core::id::RecordId;
use crate::core::service::DataService;
use crate::places::PlaceLookup;
use std::sync::Arc;

#[derive(Clone)]
pub struct LocationService {
    store: Arc<dyn DataService<Location>>,
    places: Arc<dyn PlaceLookup>,
}

impl LocationService {
    pub fn new(store: Arc<dyn DataService<Location>>, places: Arc<dyn PlaceLookup>) -> Self {
        Self { store, places }
    }

    /// place_id conflict first, then resolve the place
    pub async fn create(&self, payload: LocationRequest) -> LogisticsResult<Location> {
        self.ensure_place_free(&payload.place_id, None).await?;
        let details = self.places.details(&payload.place_id).await?;

        let location = self
            .store
            .create(Location::new(
                details.address,
                payload.place_id,
                details.latitude,
                details.longitude,
            ))
            .await?;

        tracing::info!(location_id = %location.id, place_id = %location.place_id, "location created");
        Ok(location)
    }

    pub async fn list(&self) -> LogisticsResult<Vec<Location>> {
        let locations = self.store.list().await?;
        tracing::debug!(count = locations.len(), "listed locations");
        Ok(locations)
    }

    pub async fn get(&self, id: &RecordId) -> LogisticsResult<Location> {
        tracing::debug!(location_id = %id, "fetching location");
        self.store
            .get(id)
            .await?
            .ok_or_else(|| EntityError::not_found("Location", *id).into())
    }

    /// Point the location at another place and re-resolve it
    pub async fn update(&self, id: &RecordId, payload: LocationRequest) -> LogisticsResult<Location> {
        let mut location = self.get(id).await?;
        self.ensure_place_free(&payload.place_id, Some(id)).await?;
        let details = self.places.details(&payload.place_id).await?;

        location.place_id = payload.place_id;
        location.address = details.address;
        location.latitude = details.latitude;
        location.longitude = details.longitude;
        location.touch();

        let updated = self
            .store
            .update(id, location)
            .await?
            .ok_or_else(|| EntityError::not_found("Location", *id))?;

        tracing::info!(location_id = %id, "location updated");
        Ok(updated)
    }

    pub async fn delete(&self, id: &RecordId) -> LogisticsResult<Location> {
        let location = self
            .store
            .delete(id)
            .await?
            .ok_or_else(|| EntityError::not_found("Location", *id))?;

        tracing::info!(location_id = %id, "location deleted");
        Ok(location)
    }

    async fn ensure_place_free(&self, place_id: &str, owner: Option<&RecordId>) -> LogisticsResult<()> {
        match self.store.find_one_by("place_id", place_id).await? {
            Some(existing) if Some(&existing.id) != owner => {
                Err(EntityError::already_exists("Location", "place_id", place_id).into())
            }
            _ => Ok(()),
        }
    }
}
