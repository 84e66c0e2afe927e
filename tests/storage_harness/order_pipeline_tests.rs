//! Macro-generated test suite for the order read pipeline.
//!
//! The `order_pipeline_tests!` macro runs `OrderReadPipeline` over a
//! backend's `PipelineRunner` and checks filtering, newest-first ordering,
//! stable pagination over tied timestamps and reference expansion.

/// Generate an order read pipeline suite.
///
/// `$factory` must evaluate to a fresh `Repositories`; it is re-evaluated
/// for each test.
#[macro_export]
macro_rules! order_pipeline_tests {
    ($factory:expr) => {
        mod order_pipeline_contract_tests {
            use super::*;
            use logistics::core::id::RecordId;
            use logistics::core::query::Pagination;
            use logistics::entities::OrderStatus;
            use logistics::relations::{ListParams, OrderReadPipeline};

            fn params(status: Option<OrderStatus>, page: u64, limit: u64) -> ListParams {
                ListParams {
                    status,
                    pagination: Pagination::new(page, limit),
                }
            }

            #[tokio::test]
            async fn test_expands_all_references() {
                let repos = $factory;
                let seed = seed(&repos).await;
                let order = repos
                    .orders
                    .create(order_aged(&seed, OrderStatus::Created, 0))
                    .await
                    .unwrap();

                let reads = OrderReadPipeline::new(repos.pipeline.clone());
                let view = reads.get(&order.id).await.unwrap().unwrap();

                assert_eq!(view.id, order.id);
                assert_eq!(view.status, OrderStatus::Created);
                let user = view.user.unwrap();
                assert_eq!(user.id, seed.user);
                assert_eq!(user.email, "ana@example.com");
                assert_eq!(view.truck.unwrap().plates, "ABC1234");
                assert_eq!(view.pickup.unwrap().place_id, "place-pickup");
                assert_eq!(view.dropoff.unwrap().place_id, "place-dropoff");
                assert_eq!(view.created_at, order.created_at);
            }

            #[tokio::test]
            async fn test_password_hash_never_embedded() {
                let repos = $factory;
                let seed = seed(&repos).await;
                repos
                    .orders
                    .create(order_aged(&seed, OrderStatus::Created, 0))
                    .await
                    .unwrap();

                let docs = repos
                    .pipeline
                    .aggregate(
                        "orders",
                        &OrderReadPipeline::list_pipeline(&ListParams::default()),
                    )
                    .await
                    .unwrap();
                assert_eq!(docs.len(), 1);
                assert!(docs[0]["user"].get("password_hash").is_none());
                assert_eq!(docs[0]["user"]["name"], "Ana Ruiz");
            }

            #[tokio::test]
            async fn test_get_unknown_order() {
                let repos = $factory;
                let reads = OrderReadPipeline::new(repos.pipeline.clone());
                assert!(reads.get(&RecordId::nil()).await.unwrap().is_none());
            }

            #[tokio::test]
            async fn test_newest_first_with_pagination() {
                let repos = $factory;
                let seed = seed(&repos).await;
                let mut ids = Vec::new();
                // ids[0] is the newest
                for minutes_ago in 0..12 {
                    let order = repos
                        .orders
                        .create(order_aged(&seed, OrderStatus::Created, minutes_ago))
                        .await
                        .unwrap();
                    ids.push(order.id);
                }

                let reads = OrderReadPipeline::new(repos.pipeline.clone());
                let first: Vec<_> = reads
                    .list(&params(None, 1, 5))
                    .await
                    .unwrap()
                    .into_iter()
                    .map(|o| o.id)
                    .collect();
                let third: Vec<_> = reads
                    .list(&params(None, 3, 5))
                    .await
                    .unwrap()
                    .into_iter()
                    .map(|o| o.id)
                    .collect();

                assert_eq!(first, ids[0..5].to_vec());
                assert_eq!(third, ids[10..12].to_vec());
                assert!(reads.list(&params(None, 4, 5)).await.unwrap().is_empty());
            }

            #[tokio::test]
            async fn test_identical_timestamps_page_stably() {
                let repos = $factory;
                let seed = seed(&repos).await;
                let instant = order_aged(&seed, OrderStatus::Created, 30).created_at;
                let mut ids = Vec::new();
                for _ in 0..7 {
                    let mut order = order_aged(&seed, OrderStatus::Created, 0);
                    order.created_at = instant;
                    order.updated_at = instant;
                    ids.push(repos.orders.create(order).await.unwrap().id);
                }
                // Ties fall back to the id, highest first
                ids.sort_by_key(|id| std::cmp::Reverse(id.to_hex()));

                let reads = OrderReadPipeline::new(repos.pipeline.clone());
                let mut pages = Vec::new();
                for page in 1..=3 {
                    let listed: Vec<_> = reads
                        .list(&params(None, page, 3))
                        .await
                        .unwrap()
                        .into_iter()
                        .map(|o| o.id)
                        .collect();
                    let again: Vec<_> = reads
                        .list(&params(None, page, 3))
                        .await
                        .unwrap()
                        .into_iter()
                        .map(|o| o.id)
                        .collect();
                    assert_eq!(listed, again, "page {page} changed between calls");
                    pages.push(listed);
                }

                assert_eq!(pages.iter().map(Vec::len).collect::<Vec<_>>(), vec![3, 3, 1]);
                let walked: Vec<_> = pages.concat();
                let distinct: std::collections::HashSet<_> = walked.iter().collect();
                assert_eq!(distinct.len(), 7);
                assert_eq!(walked, ids);
            }

            #[tokio::test]
            async fn test_status_filter_applies_before_paging() {
                let repos = $factory;
                let seed = seed(&repos).await;
                for minutes_ago in 0..12 {
                    repos
                        .orders
                        .create(order_aged(&seed, OrderStatus::Created, minutes_ago))
                        .await
                        .unwrap();
                }
                for minutes_ago in 20..23 {
                    repos
                        .orders
                        .create(order_aged(&seed, OrderStatus::Completed, minutes_ago))
                        .await
                        .unwrap();
                }

                let reads = OrderReadPipeline::new(repos.pipeline.clone());
                let completed = reads
                    .list(&params(Some(OrderStatus::Completed), 1, 10))
                    .await
                    .unwrap();
                assert_eq!(completed.len(), 3);
                assert!(completed.iter().all(|o| o.status == OrderStatus::Completed));

                let created_page_two = reads
                    .list(&params(Some(OrderStatus::Created), 2, 10))
                    .await
                    .unwrap();
                assert_eq!(created_page_two.len(), 2);

                let in_transit = reads
                    .list(&params(Some(OrderStatus::InTransit), 1, 10))
                    .await
                    .unwrap();
                assert!(in_transit.is_empty());
            }

            #[tokio::test]
            async fn test_dangling_references_left_out() {
                let repos = $factory;
                let seed = seed(&repos).await;
                let order = repos
                    .orders
                    .create(order_aged(&seed, OrderStatus::InTransit, 0))
                    .await
                    .unwrap();
                repos.users.delete(&seed.user).await.unwrap();
                repos.locations.delete(&seed.dropoff).await.unwrap();

                let reads = OrderReadPipeline::new(repos.pipeline.clone());
                let views = reads.list(&ListParams::default()).await.unwrap();
                assert_eq!(views.len(), 1);
                assert_eq!(views[0].id, order.id);
                assert!(views[0].user.is_none());
                assert!(views[0].dropoff.is_none());
                assert!(views[0].truck.is_some());
                assert!(views[0].pickup.is_some());
            }
        }
    };
}
