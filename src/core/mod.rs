//! Core module containing fundamental traits and types for the backend

pub mod auth;
pub mod entity;
pub mod error;
pub mod id;
pub mod pipeline;
pub mod query;
pub mod reference;
pub mod service;
pub mod validation;

pub use auth::{Claims, PasswordHasher, RequireAuth, TokenIssuer};
pub use entity::Entity;
pub use error::{LogisticsError, LogisticsResult};
pub use id::RecordId;
pub use pipeline::{Pipeline, PipelineRunner, SortDirection, Stage};
pub use query::{ListQuery, Pagination, PaginationPolicy};
pub use reference::{EntityKind, ReferenceField};
pub use service::DataService;
