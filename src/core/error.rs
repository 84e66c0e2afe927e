//! Typed error handling for the logistics backend
//!
//! Every failure that can reach a caller is a [`LogisticsError`], split into
//! categories so handlers and clients can match on the specific case instead
//! of a generic `anyhow::Error`.
//!
//! # Error Categories
//!
//! - [`EntityError`]: a record addressed by id is missing, or a unique field is taken
//! - [`ReferenceError`]: a record named by another record does not exist
//! - [`ValidationError`]: malformed input (body, path id, query parameter)
//! - [`RequestError`]: authentication failures
//! - [`StorageError`]: the store could not complete an operation
//! - [`UpstreamError`]: the place lookup service failed or knows no such place
//! - [`ConfigError`]: configuration parsing and validation
//!
//! # Example
//!
//! ```rust,ignore
//! match orders.create(payload).await {
//!     Ok(order) => println!("created {}", order.id),
//!     Err(LogisticsError::Reference(ReferenceError::NotFound { field, id, .. })) => {
//!         println!("{field} {id} does not exist");
//!     }
//!     Err(e) => eprintln!("other error: {e}"),
//! }
//! ```

use crate::core::id::{InvalidRecordId, RecordId};
use crate::core::reference::{EntityKind, ReferenceField};
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

/// The main error type for the logistics backend
#[derive(Debug, Error)]
pub enum LogisticsError {
    /// Record lookup and uniqueness errors
    #[error(transparent)]
    Entity(#[from] EntityError),

    /// Dangling references on write
    #[error(transparent)]
    Reference(#[from] ReferenceError),

    /// Input validation errors
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Authentication errors
    #[error(transparent)]
    Request(#[from] RequestError),

    /// Storage backend errors
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Place lookup errors
    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    /// Configuration errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Should not happen in normal operation
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response structure for HTTP responses
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl LogisticsError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            LogisticsError::Entity(e) => e.status_code(),
            LogisticsError::Reference(_) => StatusCode::NOT_FOUND,
            LogisticsError::Validation(_) => StatusCode::BAD_REQUEST,
            LogisticsError::Request(e) => e.status_code(),
            LogisticsError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            LogisticsError::Upstream(e) => e.status_code(),
            LogisticsError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            LogisticsError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            LogisticsError::Entity(e) => e.error_code(),
            LogisticsError::Reference(_) => "REFERENCE_NOT_FOUND",
            LogisticsError::Validation(_) => "VALIDATION_ERROR",
            LogisticsError::Request(e) => e.error_code(),
            LogisticsError::Storage(_) => "STORAGE_ERROR",
            LogisticsError::Upstream(e) => e.error_code(),
            LogisticsError::Config(_) => "CONFIG_ERROR",
            LogisticsError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Convert to an error response
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            code: self.error_code().to_string(),
            message: self.to_string(),
            details: self.details(),
        }
    }

    fn details(&self) -> Option<serde_json::Value> {
        match self {
            LogisticsError::Entity(EntityError::NotFound { entity_type, id }) => {
                Some(serde_json::json!({
                    "entity_type": entity_type,
                    "id": id.to_string()
                }))
            }
            LogisticsError::Entity(EntityError::AlreadyExists {
                entity_type,
                field,
                value,
            }) => Some(serde_json::json!({
                "entity_type": entity_type,
                "field": field,
                "value": value
            })),
            LogisticsError::Reference(ReferenceError::NotFound { field, kind, id }) => {
                Some(serde_json::json!({
                    "field": field,
                    "kind": kind,
                    "id": id.to_string()
                }))
            }
            LogisticsError::Validation(ValidationError::FieldErrors(errors)) => {
                Some(serde_json::json!({ "fields": errors }))
            }
            _ => None,
        }
    }
}

impl IntoResponse for LogisticsError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(code = self.error_code(), error = %self, "request failed");
        }
        let body = Json(self.to_response());
        (status, body).into_response()
    }
}

// =============================================================================
// Entity Errors
// =============================================================================

/// Errors related to records addressed directly by the caller
#[derive(Debug, Error)]
pub enum EntityError {
    /// No record with this id
    #[error("{entity_type} with id '{id}' not found")]
    NotFound { entity_type: String, id: RecordId },

    /// A unique field value is already taken
    #[error("{entity_type} with {field} '{value}' already exists")]
    AlreadyExists {
        entity_type: String,
        field: String,
        value: String,
    },
}

impl EntityError {
    pub fn not_found(entity_type: &str, id: RecordId) -> Self {
        EntityError::NotFound {
            entity_type: entity_type.to_string(),
            id,
        }
    }

    pub fn already_exists(entity_type: &str, field: &str, value: &str) -> Self {
        EntityError::AlreadyExists {
            entity_type: entity_type.to_string(),
            field: field.to_string(),
            value: value.to_string(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            EntityError::NotFound { .. } => StatusCode::NOT_FOUND,
            EntityError::AlreadyExists { .. } => StatusCode::CONFLICT,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            EntityError::NotFound { .. } => "ENTITY_NOT_FOUND",
            EntityError::AlreadyExists { .. } => "ENTITY_ALREADY_EXISTS",
        }
    }
}

// =============================================================================
// Reference Errors
// =============================================================================

/// A referenced record does not exist
#[derive(Debug, Error)]
pub enum ReferenceError {
    #[error("{kind} with id '{id}' referenced by '{field}' not found")]
    NotFound {
        field: ReferenceField,
        kind: EntityKind,
        id: RecordId,
    },
}

impl ReferenceError {
    pub fn not_found(field: ReferenceField, id: RecordId) -> Self {
        ReferenceError::NotFound {
            field,
            kind: field.kind(),
            id,
        }
    }
}

// =============================================================================
// Validation Errors
// =============================================================================

/// Errors related to input validation
#[derive(Debug, Error)]
pub enum ValidationError {
    /// Single field validation error
    #[error("Validation error for field '{field}': {message}")]
    FieldError { field: String, message: String },

    /// Multiple field validation errors
    #[error("Validation errors: {}", join_field_errors(.0))]
    FieldErrors(Vec<FieldValidationError>),

    /// Body is not the expected JSON
    #[error("Invalid JSON: {message}")]
    InvalidJson { message: String },

    /// Path segment is not a record id
    #[error("Invalid id format: '{value}'")]
    InvalidId { value: String },

    /// Query string parameter could not be used
    #[error("Invalid value '{value}' for query parameter '{parameter}': {message}")]
    InvalidQuery {
        parameter: String,
        value: String,
        message: String,
    },
}

/// A single field validation error
#[derive(Debug, Clone, Serialize)]
pub struct FieldValidationError {
    pub field: String,
    pub message: String,
}

impl From<InvalidRecordId> for LogisticsError {
    fn from(err: InvalidRecordId) -> Self {
        LogisticsError::Validation(ValidationError::InvalidId { value: err.0 })
    }
}

fn join_field_errors(errors: &[FieldValidationError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join(", ")
}

impl From<validator::ValidationErrors> for ValidationError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<FieldValidationError> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| FieldValidationError {
                    field: field.to_string(),
                    message: e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string()),
                })
            })
            .collect();
        // field_errors() iterates a HashMap
        fields.sort_by(|a, b| a.field.cmp(&b.field));
        ValidationError::FieldErrors(fields)
    }
}

// =============================================================================
// Request Errors
// =============================================================================

/// Errors related to the request's credentials
#[derive(Debug, Error)]
pub enum RequestError {
    /// Missing, malformed, invalid or expired credentials
    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },
}

impl RequestError {
    pub fn unauthorized(message: impl Into<String>) -> Self {
        RequestError::Unauthorized {
            message: message.into(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            RequestError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            RequestError::Unauthorized { .. } => "UNAUTHORIZED",
        }
    }
}

// =============================================================================
// Storage Errors
// =============================================================================

/// Errors related to storage backends
#[derive(Debug, Error)]
pub enum StorageError {
    /// Could not reach the backend
    #[error("Failed to connect to {backend}: {message}")]
    ConnectionError { backend: String, message: String },

    /// A read or write did not complete
    #[error("Storage operation failed: {message}")]
    OperationFailed { message: String },
}

impl From<anyhow::Error> for StorageError {
    fn from(err: anyhow::Error) -> Self {
        StorageError::OperationFailed {
            message: format!("{:#}", err),
        }
    }
}

/// Store contracts report failures as `anyhow::Error`. A unique-field
/// violation raised by a store keeps its [`EntityError`]; anything else is
/// an infrastructure failure.
impl From<anyhow::Error> for LogisticsError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast::<EntityError>() {
            Ok(entity) => LogisticsError::Entity(entity),
            Err(err) => LogisticsError::Storage(StorageError::from(err)),
        }
    }
}

// =============================================================================
// Upstream Errors
// =============================================================================

/// Errors from the external place lookup
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// The lookup service knows no such place
    #[error("The place id '{place_id}' doesn't match any location")]
    PlaceNotFound { place_id: String },

    /// The lookup service could not be used
    #[error("{service} unavailable: {message}")]
    Unavailable { service: String, message: String },
}

impl UpstreamError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            UpstreamError::PlaceNotFound { .. } => StatusCode::NOT_FOUND,
            UpstreamError::Unavailable { .. } => StatusCode::BAD_GATEWAY,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            UpstreamError::PlaceNotFound { .. } => "PLACE_NOT_FOUND",
            UpstreamError::Unavailable { .. } => "UPSTREAM_UNAVAILABLE",
        }
    }
}

// =============================================================================
// Config Errors
// =============================================================================

/// Errors related to configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to parse configuration
    #[error("Failed to parse config{}: {message}", file.as_ref().map(|f| format!(" file '{f}'")).unwrap_or_default())]
    ParseError {
        file: Option<String>,
        message: String,
    },

    /// Invalid value in configuration
    #[error("Invalid value '{value}' for '{field}': {message}")]
    InvalidValue {
        field: String,
        value: String,
        message: String,
    },

    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },
}

impl From<serde_json::Error> for LogisticsError {
    fn from(err: serde_json::Error) -> Self {
        LogisticsError::Validation(ValidationError::InvalidJson {
            message: err.to_string(),
        })
    }
}

// =============================================================================
// Result type alias
// =============================================================================

/// A specialized Result type for logistics operations
pub type LogisticsResult<T> = Result<T, LogisticsError>;
