//! Truck entity model with validation and filtering

use crate::core::id::{self, RecordId};
use crate::core::validation::{Normalize, filters};
use regex::Regex;
use serde::Deserialize;
use std::sync::OnceLock;
use validator::Validate;

crate::impl_record_entity!(Truck, "truck", "trucks", unique = ["plates"], {
    year: String,
    color: String,
    /// Unique, trimmed uppercase
    plates: String,
    /// Owning user
    user: RecordId,
});

fn validate_plates(plates: &str) -> Result<(), validator::ValidationError> {
    static PLATES_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = PLATES_REGEX
        .get_or_init(|| Regex::new(r"^[A-Za-z0-9]{6,10}$").expect("valid plates pattern"));

    if regex.is_match(plates) {
        Ok(())
    } else {
        Err(validator::ValidationError::new("plates")
            .with_message("plates must be 6 to 10 letters or digits".into()))
    }
}

/// Creation payload
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateTruck {
    #[validate(length(min = 1, message = "year is required"))]
    pub year: String,
    #[validate(length(min = 1, message = "color is required"))]
    pub color: String,
    #[validate(custom(function = "validate_plates"))]
    pub plates: String,
    pub user: RecordId,
}

impl Normalize for CreateTruck {
    fn normalize(&mut self) {
        filters::apply(&mut self.year, &[filters::trim]);
        filters::apply(&mut self.color, &[filters::trim]);
        filters::apply(&mut self.plates, &[filters::trim, filters::uppercase]);
    }
}

/// Partial truck update; at least one field
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[validate(schema(function = "validate_truck_update"))]
pub struct UpdateTruck {
    #[validate(length(min = 1, message = "year cannot be empty"))]
    pub year: Option<String>,
    #[validate(length(min = 1, message = "color cannot be empty"))]
    pub color: Option<String>,
    #[validate(custom(function = "validate_plates"))]
    pub plates: Option<String>,
    #[serde(default, deserialize_with = "id::deserialize_optional")]
    pub user: Option<RecordId>,
}

impl Normalize for UpdateTruck {
    fn normalize(&mut self) {
        filters::apply_opt(&mut self.year, &[filters::trim]);
        filters::apply_opt(&mut self.color, &[filters::trim]);
        filters::apply_opt(&mut self.plates, &[filters::trim, filters::uppercase]);
    }
}

fn validate_truck_update(update: &UpdateTruck) -> Result<(), validator::ValidationError> {
    if update.year.is_none()
        && update.color.is_none()
        && update.plates.is_none()
        && update.user.is_none()
    {
        return Err(validator::ValidationError::new("empty_update")
            .with_message("at least one field must be provided to update the truck".into()));
    }
    Ok(())
}
