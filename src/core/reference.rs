//! Names for the references an order (or truck) holds to other records

use serde::Serialize;
use std::fmt;

/// The kind of record a reference points to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum EntityKind {
    User,
    Truck,
    Location,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::User => "User",
            EntityKind::Truck => "Truck",
            EntityKind::Location => "Location",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A reference-carrying field, in the order references are reported
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReferenceField {
    User,
    Truck,
    Pickup,
    Dropoff,
}

impl ReferenceField {
    /// Field name as it appears in payloads
    pub fn as_str(&self) -> &'static str {
        match self {
            ReferenceField::User => "user",
            ReferenceField::Truck => "truck",
            ReferenceField::Pickup => "pickup",
            ReferenceField::Dropoff => "dropoff",
        }
    }

    /// The collection kind this field points into
    pub fn kind(&self) -> EntityKind {
        match self {
            ReferenceField::User => EntityKind::User,
            ReferenceField::Truck => EntityKind::Truck,
            ReferenceField::Pickup | ReferenceField::Dropoff => EntityKind::Location,
        }
    }
}

impl fmt::Display for ReferenceField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
