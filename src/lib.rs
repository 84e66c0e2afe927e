//! # Logistics backend
//!
//! Users, trucks, locations and orders behind a JSON API.
//!
//! ## Features
//!
//! - **Reference-checked writes**: an order names a user, a truck and two
//!   locations; all of them are confirmed to exist, concurrently, before
//!   the order is stored
//! - **Joined order views**: order listings are filtered, sorted newest
//!   first and paginated, then each reference is replaced by its record
//! - **Pluggable storage**: MongoDB in production, an in-memory store for
//!   tests and local runs, both behind the same traits
//! - **Place lookup**: locations are resolved from a place id through the
//!   Google Places details API
//! - **Token auth**: bcrypt passwords and HS256 bearer tokens
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use logistics::prelude::*;
//!
//! let config = AppConfig::load()?;
//! ServerBuilder::new()
//!     .with_config(config)
//!     .with_repositories(Repositories::in_memory())
//!     .serve()
//!     .await?;
//! ```

pub mod config;
pub mod core;
pub mod entities;
pub mod places;
pub mod relations;
pub mod server;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core ===
    pub use crate::core::{
        auth::{Claims, PasswordHasher, RequireAuth, TokenIssuer},
        entity::Entity,
        error::{LogisticsError, LogisticsResult},
        id::RecordId,
        pipeline::{Pipeline, PipelineRunner, SortDirection, Stage},
        query::{ListQuery, Pagination, PaginationPolicy},
        reference::{EntityKind, ReferenceField},
        service::DataService,
        validation::{Normalize, ValidatedJson},
    };

    // === Macros ===
    pub use crate::impl_record_entity;

    // === Entities ===
    pub use crate::entities::{Location, Order, OrderStatus, OrderView, Truck, User, UserProfile};

    // === Relations ===
    pub use crate::relations::{ListParams, OrderReadPipeline, OrderReferences, RelationValidator};

    // === Places ===
    pub use crate::places::{GooglePlacesClient, PlaceDetails, PlaceLookup, StaticPlaceLookup};

    // === Storage ===
    pub use crate::storage::{InMemoryDatabase, MongoDataService, MongoPipelineRunner, Repositories};

    // === Config ===
    pub use crate::config::AppConfig;

    // === Server ===
    pub use crate::server::{EntityDescriptor, EntityRegistry, ServerBuilder};

    // === External dependencies ===
    pub use anyhow::Result;
    pub use async_trait::async_trait;
    pub use chrono::{DateTime, Utc};
    pub use serde::{Deserialize, Serialize};
}
