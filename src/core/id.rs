//! Record identifiers
//!
//! Every stored record is keyed by a [`RecordId`]: a 12-byte document id,
//! rendered as 24 lowercase hex characters on the wire and in storage.

use mongodb::bson::oid::ObjectId;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Identifier of a stored record
///
/// Newly generated ids sort roughly by creation time, which the read
/// pipeline relies on as a stable tie-breaker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RecordId(ObjectId);

impl RecordId {
    /// Generate a fresh identifier
    pub fn new() -> Self {
        Self(ObjectId::new())
    }

    /// The all-zero identifier; never produced by [`RecordId::new`]
    pub fn nil() -> Self {
        Self(ObjectId::from_bytes([0; 12]))
    }

    /// Parse a 24-character hex string
    pub fn parse_str(value: &str) -> Result<Self, InvalidRecordId> {
        ObjectId::parse_str(value)
            .map(Self)
            .map_err(|_| InvalidRecordId(value.to_string()))
    }

    /// Hex representation used in JSON and storage
    pub fn to_hex(&self) -> String {
        self.0.to_hex()
    }
}

impl Default for RecordId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.to_hex())
    }
}

impl FromStr for RecordId {
    type Err = InvalidRecordId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}

/// Returned when a string is not a valid 24-hex identifier
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{0}' is not a valid record id")]
pub struct InvalidRecordId(pub String);

impl Serialize for RecordId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for RecordId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct RecordIdVisitor;

        impl Visitor<'_> for RecordIdVisitor {
            type Value = RecordId;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a 24-character hex record id")
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<RecordId, E> {
                RecordId::parse_str(value).map_err(E::custom)
            }
        }

        deserializer.deserialize_str(RecordIdVisitor)
    }
}

/// Deserialize an optional id, treating `null` and `""` as absent
///
/// Used with `#[serde(default, deserialize_with = "...")]` on partial
/// update payloads.
pub fn deserialize_optional<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<RecordId>, D::Error> {
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => RecordId::parse_str(value).map(Some).map_err(de::Error::custom),
    }
}
