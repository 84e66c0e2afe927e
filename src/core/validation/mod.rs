//! Request validation and normalisation
//!
//! Request bodies are deserialized, normalised with the field filters,
//! then checked with their `validator::Validate` rules before they reach
//! handlers.

pub mod extractor;
pub mod filters;

pub use extractor::{Normalize, ValidatedJson};
