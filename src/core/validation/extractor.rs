//! Axum extractor for validated request bodies
//!
//! This module provides the `ValidatedJson<T>` extractor that normalises
//! and validates request payloads before they reach handlers.

use crate::core::error::{LogisticsError, ValidationError};
use axum::{
    Json,
    extract::{FromRequest, Request},
};
use serde::de::DeserializeOwned;
use validator::Validate;

/// Field normalisation run before validation
///
/// Request types implement this to trim, lowercase or uppercase their
/// fields with the [`filters`](super::filters). The default does nothing.
pub trait Normalize {
    fn normalize(&mut self) {}
}

/// Axum extractor that parses, normalises and validates a JSON body
///
/// # Usage
///
/// ```rust,ignore
/// pub async fn create_truck(
///     ValidatedJson(payload): ValidatedJson<CreateTruck>,
/// ) -> Result<Json<Truck>, LogisticsError> {
///     // payload is already normalised and validated
/// }
/// ```
#[derive(Debug)]
pub struct ValidatedJson<T>(pub T);

impl<T> ValidatedJson<T> {
    /// Get the inner payload
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> std::ops::Deref for ValidatedJson<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate + Normalize + Send,
{
    type Rejection = LogisticsError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(mut payload) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| ValidationError::InvalidJson {
                message: e.body_text(),
            })?;

        payload.normalize();
        payload.validate().map_err(ValidationError::from)?;

        Ok(ValidatedJson(payload))
    }
}
