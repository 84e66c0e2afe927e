//! Order entity model, payloads and the expanded view

use crate::core::id::{self, RecordId};
use crate::core::validation::Normalize;
use crate::entities::location::Location;
use crate::entities::truck::Truck;
use crate::entities::user::UserProfile;
use crate::relations::OrderReferences;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use validator::Validate;

/// Lifecycle of an order
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderStatus {
    #[default]
    #[serde(rename = "created")]
    Created,
    #[serde(rename = "in transit")]
    InTransit,
    #[serde(rename = "completed")]
    Completed,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 3] = [
        OrderStatus::Created,
        OrderStatus::InTransit,
        OrderStatus::Completed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Created => "created",
            OrderStatus::InTransit => "in transit",
            OrderStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string names no status
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{0}' is not one of: created, in transit, completed")]
pub struct UnknownStatus(pub String);

impl FromStr for OrderStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OrderStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

crate::impl_record_entity!(Order, "order", "orders", {
    user: RecordId,
    truck: RecordId,
    pickup: RecordId,
    dropoff: RecordId,
    status: OrderStatus,
});

/// An order with its references replaced by the records they name
///
/// A reference whose record no longer exists is absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderView {
    pub id: RecordId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<UserProfile>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub truck: Option<Truck>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pickup: Option<Location>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dropoff: Option<Location>,
    pub status: OrderStatus,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

/// Creation payload
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateOrder {
    pub user: RecordId,
    pub truck: RecordId,
    pub pickup: RecordId,
    pub dropoff: RecordId,
    #[serde(default)]
    pub status: OrderStatus,
}

impl Normalize for CreateOrder {}

impl CreateOrder {
    pub fn references(&self) -> OrderReferences {
        OrderReferences {
            user: Some(self.user),
            truck: Some(self.truck),
            pickup: Some(self.pickup),
            dropoff: Some(self.dropoff),
        }
    }
}

/// Partial order update; at least one field
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[validate(schema(function = "validate_order_update"))]
pub struct UpdateOrder {
    #[serde(default, deserialize_with = "id::deserialize_optional")]
    pub user: Option<RecordId>,
    #[serde(default, deserialize_with = "id::deserialize_optional")]
    pub truck: Option<RecordId>,
    #[serde(default, deserialize_with = "id::deserialize_optional")]
    pub pickup: Option<RecordId>,
    #[serde(default, deserialize_with = "id::deserialize_optional")]
    pub dropoff: Option<RecordId>,
    pub status: Option<OrderStatus>,
}

impl Normalize for UpdateOrder {}

impl UpdateOrder {
    /// Only the references present in the payload
    pub fn references(&self) -> OrderReferences {
        OrderReferences {
            user: self.user,
            truck: self.truck,
            pickup: self.pickup,
            dropoff: self.dropoff,
        }
    }
}

fn validate_order_update(update: &UpdateOrder) -> Result<(), validator::ValidationError> {
    if update.references() == OrderReferences::default() && update.status.is_none() {
        return Err(validator::ValidationError::new("empty_update")
            .with_message("at least one field must be provided to update the order".into()));
    }
    Ok(())
}
