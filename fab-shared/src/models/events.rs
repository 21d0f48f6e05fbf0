use uuid::Uuid;

use crate::money::Cents;

/// Emitted once per persisted order row at checkout.
#[derive(Debug, serde::Serialize, serde::Deserialize, Clone)]
pub struct OrderPlacedEvent {
    pub order_id: Uuid,
    pub order_number: String,
    pub customer_email: String,
    pub total_amount: Cents,
    pub placed_at: i64,
}

/// Emitted when the production queue is manually reordered.
#[derive(Debug, serde::Serialize, serde::Deserialize, Clone)]
pub struct PriorityReassignedEvent {
    pub order_id: Uuid,
    pub new_priority: i32,
    pub reassigned_at: i64,
}
