use std::cmp::Ordering;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use fab_catalog::repository::CatalogRepository;
use fab_core::repository::RepoError;
use fab_shared::models::events::PriorityReassignedEvent;

use crate::models::Order;
use crate::repository::OrderRepository;

/// Duration used when neither the product nor the order gives us anything.
const FALLBACK_PRINT_MINUTES: i64 = 60;

/// One slot in the single-machine production timeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub order: Order,
    pub print_time_minutes: i64,
    pub estimated_start: DateTime<Utc>,
    pub estimated_end: DateTime<Utc>,
}

/// Aggregate result of a reorder batch. Already-applied updates stay in
/// place on failure; `missing_priority_column` flags the one schema problem
/// the operator can fix directly.
#[derive(Debug, Default)]
pub struct ReorderReport {
    pub applied: usize,
    pub failed: usize,
    pub missing_priority_column: bool,
    pub events: Vec<PriorityReassignedEvent>,
}

impl ReorderReport {
    pub fn is_complete(&self) -> bool {
        self.failed == 0
    }
}

/// Derived view of the active production queue plus manual re-prioritization.
///
/// There is one production line: the timeline is a strict FIFO cumulative
/// sum, no parallelism.
pub struct ScheduleQueue {
    orders: Arc<dyn OrderRepository>,
    catalog: Arc<dyn CatalogRepository>,
}

impl ScheduleQueue {
    pub fn new(orders: Arc<dyn OrderRepository>, catalog: Arc<dyn CatalogRepository>) -> Self {
        Self { orders, catalog }
    }

    /// Active orders in production order with their cumulative timeline
    /// starting at `now`.
    pub async fn load(&self, now: DateTime<Utc>) -> Result<Vec<ScheduleEntry>, RepoError> {
        let mut orders = self.orders.list_active_orders().await?;
        orders.retain(|o| o.status.is_active());
        sort_queue(&mut orders);

        let mut entries = Vec::with_capacity(orders.len());
        let mut cursor = now;
        for order in orders {
            let minutes = self.resolve_print_minutes(&order).await;
            let end = cursor + Duration::minutes(minutes);
            entries.push(ScheduleEntry {
                order,
                print_time_minutes: minutes,
                estimated_start: cursor,
                estimated_end: end,
            });
            cursor = end;
        }
        Ok(entries)
    }

    /// Persist a drag-to-reorder: the caller passes the entire displayed
    /// list and every order gets `priority = index + 1`, one update per
    /// order. Partial failure is reported in aggregate, never rolled back.
    pub async fn reprioritize(&self, ordered_ids: &[Uuid]) -> ReorderReport {
        let mut report = ReorderReport::default();

        for (index, id) in ordered_ids.iter().enumerate() {
            let priority = index as i32 + 1;
            match self.orders.update_print_priority(*id, priority).await {
                Ok(()) => {
                    report.applied += 1;
                    report.events.push(PriorityReassignedEvent {
                        order_id: *id,
                        new_priority: priority,
                        reassigned_at: Utc::now().timestamp(),
                    });
                }
                Err(RepoError::MissingPriorityColumn) => {
                    report.failed += 1;
                    report.missing_priority_column = true;
                    tracing::error!(
                        "Reorder cannot be saved: orders table lacks print_priority"
                    );
                }
                Err(e) => {
                    report.failed += 1;
                    tracing::error!("Priority update failed for order {}: {}", id, e);
                }
            }
        }

        tracing::info!(
            "Queue reorder applied {}/{} update(s)",
            report.applied,
            ordered_ids.len()
        );
        report
    }

    /// Product per-size duration when configured, size default (60/120/180)
    /// otherwise, global 60-minute fallback when the order has no size.
    async fn resolve_print_minutes(&self, order: &Order) -> i64 {
        let size = match order.selected_size {
            Some(size) => size,
            None => return FALLBACK_PRINT_MINUTES,
        };
        match self.catalog.get_product(order.product_id).await {
            Ok(Some(product)) => product.options.print_times.minutes_for(size),
            _ => size.default_minutes(),
        }
    }
}

/// Total order: explicit priority ascending first, un-prioritized orders
/// after all prioritized ones, created_at ascending as the tie-break.
pub fn sort_queue(orders: &mut [Order]) {
    orders.sort_by(|a, b| match (a.print_priority, b.print_priority) {
        (Some(x), Some(y)) => x.cmp(&y).then(a.created_at.cmp(&b.created_at)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.created_at.cmp(&b.created_at),
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Customer, Fulfillment, OrderStatus};
    use crate::repository::MemoryOrderRepository;
    use fab_catalog::options::ProductOptions;
    use fab_catalog::product::{PrintSize, Product};
    use fab_catalog::repository::MemoryCatalogRepository;
    use serde_json::json;

    fn order(priority: Option<i32>, created_offset_minutes: i64) -> Order {
        Order {
            id: Uuid::new_v4(),
            order_number: format!("FAB-1-{:08}", created_offset_minutes),
            status: OrderStatus::Pending,
            customer: Customer {
                name: "Priya Raman".to_string(),
                email: "priya@example.com".to_string(),
                phone: "555-0102".to_string(),
            },
            fulfillment: Fulfillment::Shipping {
                address: "1 Maker St".to_string(),
            },
            product_id: Uuid::new_v4(),
            product_name: "Gear Set".to_string(),
            selected_material: None,
            selected_size: None,
            selected_colors: vec![],
            customization_text: None,
            product_price: 1000,
            shipping_cost: 0,
            total_amount: 1000,
            print_priority: priority,
            created_at: Utc::now() + Duration::minutes(created_offset_minutes),
        }
    }

    #[test]
    fn test_priority_sort_with_nulls_last() {
        // A(null, t1), B(2, t2), C(1, t3) must sort as C, B, A.
        let a = order(None, 1);
        let b = order(Some(2), 2);
        let c = order(Some(1), 3);
        let mut queue = vec![a.clone(), b.clone(), c.clone()];
        sort_queue(&mut queue);
        assert_eq!(queue[0].id, c.id);
        assert_eq!(queue[1].id, b.id);
        assert_eq!(queue[2].id, a.id);
    }

    #[test]
    fn test_equal_priority_falls_back_to_fifo() {
        let first = order(Some(1), 1);
        let second = order(Some(1), 2);
        let mut queue = vec![second.clone(), first.clone()];
        sort_queue(&mut queue);
        assert_eq!(queue[0].id, first.id);
    }

    fn catalog_with(product: Product) -> Arc<MemoryCatalogRepository> {
        Arc::new(MemoryCatalogRepository::new(vec![product]))
    }

    fn product(metadata: serde_json::Value) -> Product {
        Product {
            id: Uuid::new_v4(),
            name: "Gear Set".to_string(),
            description: None,
            base_price: 1000,
            is_active: true,
            colors: vec![],
            options: ProductOptions::from_metadata(&metadata),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_cumulative_single_machine_timeline() {
        let repo = Arc::new(MemoryOrderRepository::new());
        let configured = product(json!({ "print_time_medium": 90 }));

        let mut first = order(Some(1), 0);
        first.product_id = configured.id;
        first.selected_size = Some(PrintSize::Medium);
        let mut second = order(Some(2), 0);
        second.product_id = configured.id;
        second.selected_size = Some(PrintSize::Large);
        let third = order(None, 0); // no size -> 60-minute fallback

        for o in [&first, &second, &third] {
            repo.create_order(o).await.unwrap();
        }

        let queue = ScheduleQueue::new(repo, catalog_with(configured));
        let now = Utc::now();
        let entries = queue.load(now).await.unwrap();

        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].print_time_minutes, 90);
        // Large has no configured duration, so the size default applies.
        assert_eq!(entries[1].print_time_minutes, 180);
        assert_eq!(entries[2].print_time_minutes, 60);

        assert_eq!(entries[0].estimated_start, now);
        assert_eq!(entries[1].estimated_start, entries[0].estimated_end);
        assert_eq!(entries[2].estimated_start, entries[1].estimated_end);
        assert_eq!(entries[2].estimated_end, now + Duration::minutes(330));
    }

    #[tokio::test]
    async fn test_inactive_orders_leave_the_queue() {
        let repo = Arc::new(MemoryOrderRepository::new());
        let active = order(None, 0);
        let done = order(None, 1);
        repo.create_order(&active).await.unwrap();
        repo.create_order(&done).await.unwrap();
        repo.update_order_status(done.id, OrderStatus::Ready)
            .await
            .unwrap();

        let queue = ScheduleQueue::new(repo, catalog_with(product(json!({}))));
        let entries = queue.load(Utc::now()).await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].order.id, active.id);
    }

    #[tokio::test]
    async fn test_reprioritize_assigns_display_order() {
        let repo = Arc::new(MemoryOrderRepository::new());
        let x = order(Some(1), 1);
        let y = order(Some(2), 2);
        let z = order(Some(3), 3);
        for o in [&x, &y, &z] {
            repo.create_order(o).await.unwrap();
        }

        let queue = ScheduleQueue::new(repo.clone(), catalog_with(product(json!({}))));
        // Drag Z to the top: [Z, X, Y].
        let report = queue.reprioritize(&[z.id, x.id, y.id]).await;

        assert!(report.is_complete());
        assert_eq!(report.applied, 3);

        let find = |id: Uuid| {
            repo.all_orders()
                .into_iter()
                .find(|o| o.id == id)
                .unwrap()
                .print_priority
        };
        assert_eq!(find(z.id), Some(1));
        assert_eq!(find(x.id), Some(2));
        assert_eq!(find(y.id), Some(3));
    }

    #[tokio::test]
    async fn test_reprioritize_reports_missing_column() {
        let repo = Arc::new(MemoryOrderRepository::without_priority_column());
        let a = order(None, 0);
        let b = order(None, 1);
        repo.create_order(&a).await.unwrap();
        repo.create_order(&b).await.unwrap();

        let queue = ScheduleQueue::new(repo, catalog_with(product(json!({}))));
        let report = queue.reprioritize(&[a.id, b.id]).await;

        assert_eq!(report.applied, 0);
        assert_eq!(report.failed, 2);
        assert!(report.missing_priority_column);
    }
}
