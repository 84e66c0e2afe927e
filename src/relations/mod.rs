//! Reference integrity for writes and reference expansion for reads
//!
//! - [`RelationValidator`] confirms that the records an order (or truck)
//!   names exist before it is written.
//! - [`OrderReadPipeline`] lists orders with each reference replaced by
//!   the record it names.

pub mod read_pipeline;
pub mod validator;

pub use read_pipeline::{ListParams, OrderReadPipeline};
pub use validator::{OrderReferences, Reference, RelationValidator};
