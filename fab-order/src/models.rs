use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use fab_catalog::product::PrintSize;
use fab_shared::money::Cents;

/// Production lifecycle of one physical print.
///
/// Statuses advance one step at a time; `Cancelled` is reachable from any
/// non-terminal status. Orders are never deleted, only transitioned.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Printing,
    Finishing,
    Ready,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Printing => "printing",
            OrderStatus::Finishing => "finishing",
            OrderStatus::Ready => "ready",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Some(OrderStatus::Pending),
            "confirmed" => Some(OrderStatus::Confirmed),
            "printing" => Some(OrderStatus::Printing),
            "finishing" => Some(OrderStatus::Finishing),
            "ready" => Some(OrderStatus::Ready),
            "delivered" => Some(OrderStatus::Delivered),
            "cancelled" => Some(OrderStatus::Cancelled),
            _ => None,
        }
    }

    /// Active orders occupy the print schedule; ready/delivered/cancelled
    /// have left it permanently.
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            OrderStatus::Pending
                | OrderStatus::Confirmed
                | OrderStatus::Printing
                | OrderStatus::Finishing
        )
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }

    fn next_in_chain(&self) -> Option<OrderStatus> {
        match self {
            OrderStatus::Pending => Some(OrderStatus::Confirmed),
            OrderStatus::Confirmed => Some(OrderStatus::Printing),
            OrderStatus::Printing => Some(OrderStatus::Finishing),
            OrderStatus::Finishing => Some(OrderStatus::Ready),
            OrderStatus::Ready => Some(OrderStatus::Delivered),
            OrderStatus::Delivered | OrderStatus::Cancelled => None,
        }
    }

    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        if next == OrderStatus::Cancelled {
            return !self.is_terminal();
        }
        self.next_in_chain() == Some(next)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    pub name: String,
    pub email: String,
    pub phone: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FulfillmentKind {
    Pickup,
    Delivery,
    Shipping,
}

/// How one checkout gets its goods to the customer.
///
/// Tagged variant instead of the legacy single text column that encoded
/// pickup as a `"PICKUP - <zone>"` sentinel; `storage_address` still renders
/// that form so the gateway keeps one address column.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum Fulfillment {
    Pickup { zone: String },
    Delivery { address: String },
    Shipping { address: String },
}

impl Fulfillment {
    pub fn kind(&self) -> FulfillmentKind {
        match self {
            Fulfillment::Pickup { .. } => FulfillmentKind::Pickup,
            Fulfillment::Delivery { .. } => FulfillmentKind::Delivery,
            Fulfillment::Shipping { .. } => FulfillmentKind::Shipping,
        }
    }

    /// Legacy one-column encoding used by the persistence gateway.
    pub fn storage_address(&self) -> String {
        match self {
            Fulfillment::Pickup { zone } => format!("PICKUP - {}", zone),
            Fulfillment::Delivery { address } | Fulfillment::Shipping { address } => {
                address.clone()
            }
        }
    }

    /// Decode the legacy column back into the tagged form.
    pub fn from_storage(kind: FulfillmentKind, stored: &str) -> Self {
        match kind {
            FulfillmentKind::Pickup => Fulfillment::Pickup {
                zone: stored.strip_prefix("PICKUP - ").unwrap_or(stored).to_string(),
            },
            FulfillmentKind::Delivery => Fulfillment::Delivery {
                address: stored.to_string(),
            },
            FulfillmentKind::Shipping => Fulfillment::Shipping {
                address: stored.to_string(),
            },
        }
    }
}

/// One persisted order row. One row per physical unit, not per cart line:
/// each print is scheduled and tracked independently.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: Uuid,
    pub order_number: String,
    pub status: OrderStatus,
    pub customer: Customer,
    pub fulfillment: Fulfillment,
    pub product_id: Uuid,
    pub product_name: String,
    pub selected_material: Option<String>,
    pub selected_size: Option<PrintSize>,
    pub selected_colors: Vec<String>,
    pub customization_text: Option<String>,
    pub product_price: Cents,
    pub shipping_cost: Cents,
    pub total_amount: Cents,
    pub print_priority: Option<i32>,
    pub created_at: DateTime<Utc>,
}
