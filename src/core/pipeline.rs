//! Store-agnostic aggregation pipelines
//!
//! A [`Pipeline`] is an ordered list of declarative [`Stage`]s over JSON
//! documents. It says nothing about how a store executes it: the in-memory
//! backend interprets the stages directly, the MongoDB backend translates
//! them into native aggregation stages. Both sit behind [`PipelineRunner`].
//!
//! Field names are the ones records carry in JSON (`id`, `createdAt`, ...).
//!
//! # Example
//!
//! ```rust,ignore
//! let pipeline = Pipeline::new()
//!     .match_eq("status", "created")
//!     .sort_by("createdAt", SortDirection::Descending)
//!     .skip(10)
//!     .limit(10)
//!     .lookup_one("users", "user", "user");
//!
//! let docs = runner.aggregate("orders", &pipeline).await?;
//! ```

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;

/// Direction of a sort key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// One key of a compound sort
#[derive(Debug, Clone, PartialEq)]
pub struct SortKey {
    pub field: String,
    pub direction: SortDirection,
}

/// A single pipeline stage
#[derive(Debug, Clone, PartialEq)]
pub enum Stage {
    /// Keep documents whose `field` equals `value`
    Match { field: String, value: Value },

    /// Order documents by the keys, first key most significant
    Sort(Vec<SortKey>),

    /// Drop the first `n` documents
    Skip(u64),

    /// Keep at most `n` documents
    Limit(u64),

    /// Left-join on `from.id == local_field` and flatten the single match
    /// into `as_field`. Without a match `as_field` is removed.
    LookupOne {
        from: String,
        local_field: String,
        as_field: String,
    },

    /// Remove a field, addressed with a dotted path (`user.password_hash`)
    Exclude(String),
}

/// An ordered list of stages
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Pipeline {
    stages: Vec<Stage>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    pub fn push(mut self, stage: Stage) -> Self {
        self.stages.push(stage);
        self
    }

    pub fn match_eq(self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.push(Stage::Match {
            field: field.into(),
            value: value.into(),
        })
    }

    /// Append a sort stage, or extend the previous one when it is a sort
    pub fn sort_by(mut self, field: impl Into<String>, direction: SortDirection) -> Self {
        let key = SortKey {
            field: field.into(),
            direction,
        };
        match self.stages.last_mut() {
            Some(Stage::Sort(keys)) => keys.push(key),
            _ => self.stages.push(Stage::Sort(vec![key])),
        }
        self
    }

    pub fn skip(self, n: u64) -> Self {
        self.push(Stage::Skip(n))
    }

    pub fn limit(self, n: u64) -> Self {
        self.push(Stage::Limit(n))
    }

    pub fn lookup_one(
        self,
        from: impl Into<String>,
        local_field: impl Into<String>,
        as_field: impl Into<String>,
    ) -> Self {
        self.push(Stage::LookupOne {
            from: from.into(),
            local_field: local_field.into(),
            as_field: as_field.into(),
        })
    }

    pub fn exclude(self, path: impl Into<String>) -> Self {
        self.push(Stage::Exclude(path.into()))
    }
}

/// Executes pipelines against a store
#[async_trait]
pub trait PipelineRunner: Send + Sync {
    /// Run `pipeline` over the documents of `collection`
    async fn aggregate(&self, collection: &str, pipeline: &Pipeline) -> Result<Vec<Value>>;
}
