//! Order views with their references expanded
//!
//! Orders are filtered, sorted newest first and paginated on the orders
//! collection itself, and only the resulting page is joined with users,
//! trucks and locations. A reference that no longer resolves leaves its
//! field empty instead of failing the page.

use crate::core::entity::Entity;
use crate::core::error::{LogisticsError, LogisticsResult};
use crate::core::id::RecordId;
use crate::core::pipeline::{Pipeline, PipelineRunner, SortDirection};
use crate::core::query::Pagination;
use crate::core::reference::ReferenceField;
use crate::entities::order::{Order, OrderStatus, OrderView};
use crate::relations::validator::RelationValidator;
use anyhow::Context;
use serde_json::Value;
use std::sync::Arc;

/// Embedded user field never exposed in a view
const USER_PASSWORD_PATH: &str = "user.password_hash";

/// Filter and page window for listing orders
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListParams {
    pub status: Option<OrderStatus>,
    pub pagination: Pagination,
}

/// Builds and runs the order read pipelines
#[derive(Clone)]
pub struct OrderReadPipeline {
    runner: Arc<dyn PipelineRunner>,
}

impl OrderReadPipeline {
    pub fn new(runner: Arc<dyn PipelineRunner>) -> Self {
        Self { runner }
    }

    /// match(status?) → sort → skip → limit → the four joins
    pub fn list_pipeline(params: &ListParams) -> Pipeline {
        let mut pipeline = Pipeline::new();
        if let Some(status) = params.status {
            pipeline = pipeline.match_eq("status", status.as_str());
        }

        let pipeline = pipeline
            .sort_by("createdAt", SortDirection::Descending)
            .sort_by("id", SortDirection::Descending)
            .skip(params.pagination.skip())
            .limit(params.pagination.limit);

        Self::expand(pipeline)
    }

    /// The joins for a single order
    pub fn single_pipeline(id: &RecordId) -> Pipeline {
        Self::expand(Pipeline::new().match_eq("id", id.to_hex()).limit(1))
    }

    fn expand(pipeline: Pipeline) -> Pipeline {
        [
            ReferenceField::User,
            ReferenceField::Truck,
            ReferenceField::Pickup,
            ReferenceField::Dropoff,
        ]
        .into_iter()
        .fold(pipeline, |pipeline, field| {
            pipeline.lookup_one(
                RelationValidator::collection_for(field),
                field.as_str(),
                field.as_str(),
            )
        })
        .exclude(USER_PASSWORD_PATH)
    }

    /// One page of expanded orders
    pub async fn list(&self, params: &ListParams) -> LogisticsResult<Vec<OrderView>> {
        let docs = self
            .runner
            .aggregate(Order::resource_name(), &Self::list_pipeline(params))
            .await?;
        decode(docs)
    }

    /// One expanded order, if it exists
    pub async fn get(&self, id: &RecordId) -> LogisticsResult<Option<OrderView>> {
        let docs = self
            .runner
            .aggregate(Order::resource_name(), &Self::single_pipeline(id))
            .await?;
        Ok(decode(docs)?.into_iter().next())
    }
}

fn decode(docs: Vec<Value>) -> LogisticsResult<Vec<OrderView>> {
    docs.into_iter()
        .map(|doc| {
            serde_json::from_value::<OrderView>(doc)
                .context("stored order does not decode into an order view")
                .map_err(LogisticsError::from)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::pipeline::{SortKey, Stage};

    #[test]
    fn test_list_pipeline_pages_before_joining() {
        let params = ListParams {
            status: Some(OrderStatus::Completed),
            pagination: Pagination::new(2, 5),
        };
        let pipeline = OrderReadPipeline::list_pipeline(&params);
        let stages = pipeline.stages();

        assert_eq!(
            stages[0],
            Stage::Match {
                field: "status".to_string(),
                value: Value::String("completed".to_string()),
            }
        );
        assert_eq!(
            stages[1],
            Stage::Sort(vec![
                SortKey {
                    field: "createdAt".to_string(),
                    direction: SortDirection::Descending,
                },
                SortKey {
                    field: "id".to_string(),
                    direction: SortDirection::Descending,
                },
            ])
        );
        assert_eq!(stages[2], Stage::Skip(5));
        assert_eq!(stages[3], Stage::Limit(5));

        let joins: Vec<_> = stages[4..8]
            .iter()
            .map(|stage| match stage {
                Stage::LookupOne { from, as_field, .. } => (from.as_str(), as_field.as_str()),
                other => panic!("expected lookup, got {other:?}"),
            })
            .collect();
        assert_eq!(
            joins,
            vec![
                ("users", "user"),
                ("trucks", "truck"),
                ("locations", "pickup"),
                ("locations", "dropoff"),
            ]
        );
        assert_eq!(stages[8], Stage::Exclude("user.password_hash".to_string()));
    }

    #[test]
    fn test_no_status_means_no_match_stage() {
        let pipeline = OrderReadPipeline::list_pipeline(&ListParams::default());
        assert!(matches!(pipeline.stages()[0], Stage::Sort(_)));
        assert_eq!(pipeline.stages()[1], Stage::Skip(0));
        assert_eq!(pipeline.stages()[2], Stage::Limit(10));
    }

    #[test]
    fn test_single_pipeline_matches_id() {
        let id = RecordId::new();
        let pipeline = OrderReadPipeline::single_pipeline(&id);
        assert_eq!(
            pipeline.stages()[0],
            Stage::Match {
                field: "id".to_string(),
                value: Value::String(id.to_hex()),
            }
        );
    }
}
