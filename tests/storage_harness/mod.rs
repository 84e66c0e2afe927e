//! Shared test harness for storage backend testing
//!
//! Provides record builders and a seeded fixture used by the macro-generated
//! contract suites, so every backend is held to the same behaviour.
//!
//! # Usage
//!
//! From any integration test file in `tests/`:
//! ```rust,ignore
//! #[macro_use]
//! mod storage_harness;
//! use storage_harness::*;
//! ```

#![allow(dead_code)]

#[macro_use]
pub mod data_service_tests;
#[macro_use]
pub mod order_pipeline_tests;

use chrono::Duration;
use logistics::core::id::RecordId;
use logistics::entities::{Location, Order, OrderStatus, Truck, User};
use logistics::storage::Repositories;

pub fn user(name: &str, email: &str) -> User {
    User::new(name.to_string(), email.to_string(), "$2b$04$not-a-real-hash".to_string())
}

pub fn truck(plates: &str, owner: RecordId) -> Truck {
    Truck::new("2021".to_string(), "white".to_string(), plates.to_string(), owner)
}

pub fn location(place_id: &str, address: &str) -> Location {
    Location::new(address.to_string(), place_id.to_string(), 19.43, -99.13)
}

/// An order created `minutes_ago` minutes in the past
pub fn order_aged(seed: &Seed, status: OrderStatus, minutes_ago: i64) -> Order {
    let mut order = Order::new(seed.user, seed.truck, seed.pickup, seed.dropoff, status);
    order.created_at -= Duration::minutes(minutes_ago);
    order.updated_at = order.created_at;
    order
}

/// Ids of one record of each kind an order references
#[derive(Debug, Clone, Copy)]
pub struct Seed {
    pub user: RecordId,
    pub truck: RecordId,
    pub pickup: RecordId,
    pub dropoff: RecordId,
}

/// Store a user, a truck and two locations
pub async fn seed(repos: &Repositories) -> Seed {
    let owner = repos
        .users
        .create(user("Ana Ruiz", "ana@example.com"))
        .await
        .unwrap();
    let truck = repos
        .trucks
        .create(truck("ABC1234", owner.id))
        .await
        .unwrap();
    let pickup = repos
        .locations
        .create(location("place-pickup", "Av. Reforma 222"))
        .await
        .unwrap();
    let dropoff = repos
        .locations
        .create(location("place-dropoff", "Calle 5 de Mayo 10"))
        .await
        .unwrap();

    Seed {
        user: owner.id,
        truck: truck.id,
        pickup: pickup.id,
        dropoff: dropoff.id,
    }
}
