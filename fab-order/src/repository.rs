use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use fab_core::repository::RepoError;

use crate::models::{Order, OrderStatus};

/// Persistence gateway for order rows.
///
/// All writes are last-write-wins at the gateway; the engine does no
/// optimistic concurrency control of its own.
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Persist one order row (one physical unit) and return its order number.
    async fn create_order(&self, order: &Order) -> Result<String, RepoError>;

    async fn update_order_status(&self, id: Uuid, status: OrderStatus) -> Result<(), RepoError>;

    async fn update_print_priority(&self, id: Uuid, priority: i32) -> Result<(), RepoError>;

    async fn list_active_orders(&self) -> Result<Vec<Order>, RepoError>;

    async fn get_order(&self, id: Uuid) -> Result<Option<Order>, RepoError>;
}

/// In-memory gateway for tests and demos, with injectable failure points to
/// exercise the partial-batch contracts.
pub struct MemoryOrderRepository {
    orders: Mutex<Vec<Order>>,
    fail_creates_after: Option<usize>,
    priority_column_missing: bool,
}

impl MemoryOrderRepository {
    pub fn new() -> Self {
        Self {
            orders: Mutex::new(Vec::new()),
            fail_creates_after: None,
            priority_column_missing: false,
        }
    }

    /// Every create after the first `n` fails with a backend error.
    pub fn failing_creates_after(n: usize) -> Self {
        Self {
            fail_creates_after: Some(n),
            ..Self::new()
        }
    }

    /// Simulate a schema that predates the print_priority migration.
    pub fn without_priority_column() -> Self {
        Self {
            priority_column_missing: true,
            ..Self::new()
        }
    }

    pub fn all_orders(&self) -> Vec<Order> {
        self.orders.lock().unwrap().clone()
    }
}

impl Default for MemoryOrderRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OrderRepository for MemoryOrderRepository {
    async fn create_order(&self, order: &Order) -> Result<String, RepoError> {
        let mut orders = self.orders.lock().unwrap();
        if let Some(limit) = self.fail_creates_after {
            if orders.len() >= limit {
                return Err(RepoError::Backend("simulated insert failure".to_string()));
            }
        }
        orders.push(order.clone());
        Ok(order.order_number.clone())
    }

    async fn update_order_status(&self, id: Uuid, status: OrderStatus) -> Result<(), RepoError> {
        let mut orders = self.orders.lock().unwrap();
        let order = orders
            .iter_mut()
            .find(|o| o.id == id)
            .ok_or_else(|| RepoError::NotFound(id.to_string()))?;
        order.status = status;
        Ok(())
    }

    async fn update_print_priority(&self, id: Uuid, priority: i32) -> Result<(), RepoError> {
        if self.priority_column_missing {
            return Err(RepoError::MissingPriorityColumn);
        }
        let mut orders = self.orders.lock().unwrap();
        let order = orders
            .iter_mut()
            .find(|o| o.id == id)
            .ok_or_else(|| RepoError::NotFound(id.to_string()))?;
        order.print_priority = Some(priority);
        Ok(())
    }

    async fn list_active_orders(&self) -> Result<Vec<Order>, RepoError> {
        Ok(self
            .orders
            .lock()
            .unwrap()
            .iter()
            .filter(|o| o.status.is_active())
            .cloned()
            .collect())
    }

    async fn get_order(&self, id: Uuid) -> Result<Option<Order>, RepoError> {
        Ok(self
            .orders
            .lock()
            .unwrap()
            .iter()
            .find(|o| o.id == id)
            .cloned())
    }
}
