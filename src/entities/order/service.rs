//! Order writes guarded by reference checks, reads through the pipeline

use super::model::{CreateOrder, Order, OrderView, UpdateOrder};
use crate::core::entity::Entity;
use crate::core::error::{EntityError, LogisticsResult};
use crate::core::id::RecordId;
use crate::core::service::DataService;
use crate::relations::{ListParams, OrderReadPipeline, RelationValidator};
use std::sync::Arc;

#[derive(Clone)]
pub struct OrderService {
    store: Arc<dyn DataService<Order>>,
    relations: RelationValidator,
    reads: OrderReadPipeline,
}

impl OrderService {
    pub fn new(
        store: Arc<dyn DataService<Order>>,
        relations: RelationValidator,
        reads: OrderReadPipeline,
    ) -> Self {
        Self {
            store,
            relations,
            reads,
        }
    }

    /// All four references must exist before the order is stored
    pub async fn create(&self, payload: CreateOrder) -> LogisticsResult<Order> {
        self.relations
            .validate_order_references(&payload.references())
            .await?;

        let order = self
            .store
            .create(Order::new(
                payload.user,
                payload.truck,
                payload.pickup,
                payload.dropoff,
                payload.status,
            ))
            .await?;

        tracing::info!(order_id = %order.id, status = %order.status, "order created");
        Ok(order)
    }

    /// Only the references present in the payload are checked
    pub async fn update(&self, id: &RecordId, payload: UpdateOrder) -> LogisticsResult<Order> {
        let mut order = self
            .store
            .get(id)
            .await?
            .ok_or_else(|| EntityError::not_found("Order", *id))?;

        let refs = payload.references();
        self.relations.validate_order_references(&refs).await?;

        if let Some(user) = refs.user {
            order.user = user;
        }
        if let Some(truck) = refs.truck {
            order.truck = truck;
        }
        if let Some(pickup) = refs.pickup {
            order.pickup = pickup;
        }
        if let Some(dropoff) = refs.dropoff {
            order.dropoff = dropoff;
        }
        if let Some(status) = payload.status {
            order.status = status;
        }
        order.touch();

        let updated = self
            .store
            .update(id, order)
            .await?
            .ok_or_else(|| EntityError::not_found("Order", *id))?;

        tracing::info!(order_id = %id, status = %updated.status, "order updated");
        Ok(updated)
    }

    pub async fn delete(&self, id: &RecordId) -> LogisticsResult<Order> {
        let order = self
            .store
            .delete(id)
            .await?
            .ok_or_else(|| EntityError::not_found("Order", *id))?;

        tracing::info!(order_id = %id, "order deleted");
        Ok(order)
    }

    /// One order with its references expanded
    pub async fn get(&self, id: &RecordId) -> LogisticsResult<OrderView> {
        tracing::debug!(order_id = %id, "fetching order view");
        self.reads
            .get(id)
            .await?
            .ok_or_else(|| EntityError::not_found("Order", *id).into())
    }

    /// A page of orders with references expanded
    pub async fn list(&self, params: &ListParams) -> LogisticsResult<Vec<OrderView>> {
        let views = self.reads.list(params).await?;
        tracing::debug!(
            count = views.len(),
            page = params.pagination.page,
            limit = params.pagination.limit,
            status = ?params.status,
            "listed orders"
        );
        Ok(views)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::query::Pagination;
    use crate::entities::location::Location;
    use crate::entities::order::OrderStatus;
    use crate::entities::truck::Truck;
    use crate::entities::user::User;
    use crate::storage::in_memory::InMemoryDatabase;

    struct World {
        orders: OrderService,
        users: Arc<dyn DataService<User>>,
        user: RecordId,
        truck: RecordId,
        pickup: RecordId,
        dropoff: RecordId,
    }

    async fn world() -> World {
        let db = InMemoryDatabase::new();
        let users: Arc<dyn DataService<User>> = Arc::new(db.service::<User>());
        let trucks: Arc<dyn DataService<Truck>> = Arc::new(db.service::<Truck>());
        let locations: Arc<dyn DataService<Location>> = Arc::new(db.service::<Location>());

        let user = users
            .create(User::new("Ana".into(), "ana@example.com".into(), "hash".into()))
            .await
            .unwrap();
        let truck = trucks
            .create(Truck::new("2020".into(), "red".into(), "ABC1234".into(), user.id))
            .await
            .unwrap();
        let pickup = locations
            .create(Location::new("A".into(), "pa".into(), 1.0, 1.0))
            .await
            .unwrap();
        let dropoff = locations
            .create(Location::new("B".into(), "pb".into(), 2.0, 2.0))
            .await
            .unwrap();

        let relations = RelationValidator::new(users.clone(), trucks, locations);
        let orders = OrderService::new(
            Arc::new(db.service::<Order>()),
            relations,
            OrderReadPipeline::new(Arc::new(db.clone())),
        );

        World {
            orders,
            users,
            user: user.id,
            truck: truck.id,
            pickup: pickup.id,
            dropoff: dropoff.id,
        }
    }

    fn payload(w: &World) -> CreateOrder {
        CreateOrder {
            user: w.user,
            truck: w.truck,
            pickup: w.pickup,
            dropoff: w.dropoff,
            status: OrderStatus::Created,
        }
    }

    #[tokio::test]
    async fn test_create_then_view_expanded() {
        let w = world().await;
        let order = w.orders.create(payload(&w)).await.unwrap();
        assert_eq!(order.status, OrderStatus::Created);

        let view = w.orders.get(&order.id).await.unwrap();
        assert_eq!(view.user.unwrap().id, w.user);
        assert_eq!(view.truck.unwrap().id, w.truck);
        assert_eq!(view.pickup.unwrap().id, w.pickup);
        assert_eq!(view.dropoff.unwrap().id, w.dropoff);
    }

    #[tokio::test]
    async fn test_create_with_unknown_user_fails() {
        let w = world().await;
        let mut bad = payload(&w);
        bad.user = RecordId::nil();

        let err = w.orders.create(bad).await.unwrap_err();
        assert_eq!(err.error_code(), "REFERENCE_NOT_FOUND");
        assert!(err.to_string().contains("000000000000000000000000"));
        assert!(
            w.orders
                .list(&ListParams::default())
                .await
                .unwrap()
                .is_empty()
        );
    }

    #[tokio::test]
    async fn test_update_only_checks_present_references() {
        let w = world().await;
        let order = w.orders.create(payload(&w)).await.unwrap();

        // The user disappears after the order was created
        w.users.delete(&w.user).await.unwrap();

        let updated = w
            .orders
            .update(
                &order.id,
                UpdateOrder {
                    status: Some(OrderStatus::InTransit),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.status, OrderStatus::InTransit);
        assert_eq!(updated.user, w.user);

        let err = w
            .orders
            .update(
                &order.id,
                UpdateOrder {
                    truck: Some(RecordId::new()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.error_code(), "REFERENCE_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_dangling_reference_left_empty_in_view() {
        let w = world().await;
        let order = w.orders.create(payload(&w)).await.unwrap();
        w.users.delete(&w.user).await.unwrap();

        let view = w.orders.get(&order.id).await.unwrap();
        assert!(view.user.is_none());
        assert!(view.truck.is_some());
    }

    #[tokio::test]
    async fn test_missing_order_is_not_found() {
        let w = world().await;
        assert_eq!(
            w.orders.get(&RecordId::nil()).await.unwrap_err().error_code(),
            "ENTITY_NOT_FOUND"
        );
        assert_eq!(
            w.orders.delete(&RecordId::nil()).await.unwrap_err().error_code(),
            "ENTITY_NOT_FOUND"
        );
        let err = w
            .orders
            .update(
                &RecordId::nil(),
                UpdateOrder {
                    status: Some(OrderStatus::Completed),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.error_code(), "ENTITY_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_list_filters_and_pages() {
        let w = world().await;
        for _ in 0..12 {
            w.orders.create(payload(&w)).await.unwrap();
        }
        for _ in 0..3 {
            let mut done = payload(&w);
            done.status = OrderStatus::Completed;
            w.orders.create(done).await.unwrap();
        }

        let completed = w
            .orders
            .list(&ListParams {
                status: Some(OrderStatus::Completed),
                pagination: Pagination::new(1, 10),
            })
            .await
            .unwrap();
        assert_eq!(completed.len(), 3);
        assert!(completed.iter().all(|o| o.status == OrderStatus::Completed));

        let first = w
            .orders
            .list(&ListParams {
                status: None,
                pagination: Pagination::new(1, 10),
            })
            .await
            .unwrap();
        let second = w
            .orders
            .list(&ListParams {
                status: None,
                pagination: Pagination::new(2, 10),
            })
            .await
            .unwrap();
        assert_eq!(first.len(), 10);
        assert_eq!(second.len(), 5);
        assert!(first.iter().all(|a| second.iter().all(|b| a.id != b.id)));
    }
}
