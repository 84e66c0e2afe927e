//! Location entity model

use crate::core::validation::{Normalize, filters};
use serde::Deserialize;
use validator::Validate;

crate::impl_record_entity!(Location, "location", "locations", unique = ["place_id"], {
    /// Formatted address from the place lookup
    address: String,
    /// Unique place identifier
    place_id: String,
    latitude: f64,
    longitude: f64,
});

/// Create and update payload; everything else comes from the place lookup
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LocationRequest {
    #[validate(length(min = 1, message = "place_id is required"))]
    pub place_id: String,
}

impl Normalize for LocationRequest {
    fn normalize(&mut self) {
        filters::apply(&mut self.place_id, &[filters::trim]);
    }
}
