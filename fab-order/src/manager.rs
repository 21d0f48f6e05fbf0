use std::sync::Arc;

use uuid::Uuid;

use fab_core::repository::RepoError;

use crate::models::{Order, OrderStatus};
use crate::repository::OrderRepository;

#[derive(Debug, thiserror::Error)]
pub enum OrderError {
    #[error("Order not found: {0}")]
    NotFound(Uuid),

    #[error("Invalid state transition from {from} to {to}")]
    InvalidTransition { from: &'static str, to: &'static str },

    #[error(transparent)]
    Repo(#[from] RepoError),
}

/// Status transition API over the persistence gateway. Transitions advance
/// one step at a time; cancellation is allowed from any non-terminal status.
pub struct OrderManager {
    repo: Arc<dyn OrderRepository>,
}

impl OrderManager {
    pub fn new(repo: Arc<dyn OrderRepository>) -> Self {
        Self { repo }
    }

    pub async fn update_status(&self, id: Uuid, next: OrderStatus) -> Result<Order, OrderError> {
        let order = self
            .repo
            .get_order(id)
            .await?
            .ok_or(OrderError::NotFound(id))?;

        if !order.status.can_transition_to(next) {
            return Err(OrderError::InvalidTransition {
                from: order.status.as_str(),
                to: next.as_str(),
            });
        }

        self.repo.update_order_status(id, next).await?;
        tracing::info!("Order {} moved to {}", order.order_number, next.as_str());

        Ok(Order {
            status: next,
            ..order
        })
    }

    pub async fn cancel(&self, id: Uuid) -> Result<Order, OrderError> {
        self.update_status(id, OrderStatus::Cancelled).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Customer, Fulfillment};
    use crate::repository::MemoryOrderRepository;
    use chrono::Utc;

    fn pending_order() -> Order {
        let id = Uuid::new_v4();
        Order {
            id,
            order_number: "FAB-1-TEST".to_string(),
            status: OrderStatus::Pending,
            customer: Customer {
                name: "Ines Moretti".to_string(),
                email: "ines@example.com".to_string(),
                phone: "555-0101".to_string(),
            },
            fulfillment: Fulfillment::Pickup {
                zone: "Alpharetta, Georgia".to_string(),
            },
            product_id: Uuid::new_v4(),
            product_name: "Cable Spool".to_string(),
            selected_material: None,
            selected_size: None,
            selected_colors: vec![],
            customization_text: None,
            product_price: 1000,
            shipping_cost: 0,
            total_amount: 1000,
            print_priority: None,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_step_by_step_advance() {
        let repo = Arc::new(MemoryOrderRepository::new());
        let order = pending_order();
        repo.create_order(&order).await.unwrap();
        let manager = OrderManager::new(repo.clone());

        manager
            .update_status(order.id, OrderStatus::Confirmed)
            .await
            .unwrap();
        let err = manager
            .update_status(order.id, OrderStatus::Finishing)
            .await
            .unwrap_err();
        assert!(matches!(err, OrderError::InvalidTransition { .. }));
    }

    #[tokio::test]
    async fn test_cancel_non_terminal() {
        let repo = Arc::new(MemoryOrderRepository::new());
        let order = pending_order();
        repo.create_order(&order).await.unwrap();
        let manager = OrderManager::new(repo.clone());

        let cancelled = manager.cancel(order.id).await.unwrap();
        assert_eq!(cancelled.status, OrderStatus::Cancelled);

        let err = manager.cancel(order.id).await.unwrap_err();
        assert!(matches!(err, OrderError::InvalidTransition { .. }));
    }
}
