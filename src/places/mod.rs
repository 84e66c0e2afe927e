//! Place lookup
//!
//! Locations are created from a place id; address and coordinates come
//! from an external lookup. [`PlaceLookup`] is the seam; the Google Places
//! details API backs it in production and [`StaticPlaceLookup`] serves
//! fixed places for tests and keyless setups.

use crate::core::error::{LogisticsResult, UpstreamError, ValidationError};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;

/// Default Google Places API root
pub const GOOGLE_PLACES_BASE_URL: &str = "https://maps.googleapis.com/maps/api/place";

const SERVICE_NAME: &str = "Google Places";

/// What a place id resolves to
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceDetails {
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// Resolves place ids
#[async_trait]
pub trait PlaceLookup: Send + Sync {
    /// Details for `place_id`; an unknown id is `UpstreamError::PlaceNotFound`
    async fn details(&self, place_id: &str) -> LogisticsResult<PlaceDetails>;
}

fn require_place_id(place_id: &str) -> LogisticsResult<()> {
    if place_id.trim().is_empty() {
        return Err(ValidationError::FieldError {
            field: "place_id".to_string(),
            message: "place id is required".to_string(),
        }
        .into());
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Google Places
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct DetailsResponse {
    result: Option<PlaceResult>,
    #[serde(default)]
    status: String,
}

#[derive(Debug, Deserialize)]
struct PlaceResult {
    formatted_address: String,
    geometry: Geometry,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: LatLng,
}

#[derive(Debug, Deserialize)]
struct LatLng {
    lat: f64,
    lng: f64,
}

/// Client for the Places details endpoint
#[derive(Debug, Clone)]
pub struct GooglePlacesClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl GooglePlacesClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(api_key, GOOGLE_PLACES_BASE_URL)
    }

    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn unavailable(message: impl std::fmt::Display) -> UpstreamError {
        UpstreamError::Unavailable {
            service: SERVICE_NAME.to_string(),
            message: message.to_string(),
        }
    }
}

#[async_trait]
impl PlaceLookup for GooglePlacesClient {
    async fn details(&self, place_id: &str) -> LogisticsResult<PlaceDetails> {
        require_place_id(place_id)?;

        let url = format!("{}/details/json", self.base_url);
        tracing::debug!(place_id, "resolving place");

        let response: DetailsResponse = self
            .http
            .get(&url)
            .query(&[("place_id", place_id), ("key", self.api_key.as_str())])
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(Self::unavailable)?
            .json()
            .await
            .map_err(Self::unavailable)?;

        let Some(result) = response.result else {
            tracing::debug!(place_id, status = %response.status, "place not found");
            return Err(UpstreamError::PlaceNotFound {
                place_id: place_id.to_string(),
            }
            .into());
        };

        Ok(PlaceDetails {
            address: result.formatted_address,
            latitude: result.geometry.location.lat,
            longitude: result.geometry.location.lng,
        })
    }
}

// ---------------------------------------------------------------------------
// Static lookup
// ---------------------------------------------------------------------------

/// Lookup over a fixed set of places
#[derive(Debug, Clone, Default)]
pub struct StaticPlaceLookup {
    places: HashMap<String, PlaceDetails>,
}

impl StaticPlaceLookup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_place(mut self, place_id: impl Into<String>, details: PlaceDetails) -> Self {
        self.places.insert(place_id.into(), details);
        self
    }
}

#[async_trait]
impl PlaceLookup for StaticPlaceLookup {
    async fn details(&self, place_id: &str) -> LogisticsResult<PlaceDetails> {
        require_place_id(place_id)?;
        self.places.get(place_id).cloned().ok_or_else(|| {
            UpstreamError::PlaceNotFound {
                place_id: place_id.to_string(),
            }
            .into()
        })
    }
}
