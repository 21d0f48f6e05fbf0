use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use fab_shared::models::events::OrderPlacedEvent;
use fab_shared::money::Cents;

use crate::cart::CartLine;
use crate::models::{Customer, Fulfillment, Order, OrderStatus};
use crate::repository::OrderRepository;

#[derive(Debug, thiserror::Error)]
pub enum CheckoutError {
    #[error("Required customer fields missing: {}", missing.join(", "))]
    Validation { missing: Vec<&'static str> },

    #[error("Cart is empty")]
    EmptyCart,
}

/// One unit that could not be persisted. Earlier rows stay in place; there
/// is no rollback.
#[derive(Debug, Clone)]
pub struct AssemblyFailure {
    pub line_index: usize,
    pub unit_index: u32,
    pub error: String,
}

/// First-class result of the per-unit creation loop: which rows were
/// created, which order number carries the checkout's shipping cost, and
/// which units failed.
#[derive(Debug, Default)]
pub struct AssemblyReport {
    pub order_numbers: Vec<String>,
    pub shipping_carried_by: Option<String>,
    pub failures: Vec<AssemblyFailure>,
    pub events: Vec<OrderPlacedEvent>,
}

impl AssemblyReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Turns priced cart contents into persisted order rows, one row per
/// physical unit. Creation is sequential and not transactional by design.
pub struct OrderAssembler {
    repo: Arc<dyn OrderRepository>,
}

impl OrderAssembler {
    pub fn new(repo: Arc<dyn OrderRepository>) -> Self {
        Self { repo }
    }

    /// Validate, then create one order row per unit in line order.
    ///
    /// Shipping is billed once per checkout: only the very first created row
    /// carries `shipping_cost`; every other row totals just its unit price.
    pub async fn assemble(
        &self,
        lines: &[CartLine],
        customer: &Customer,
        fulfillment: &Fulfillment,
        shipping_cost: Cents,
    ) -> Result<AssemblyReport, CheckoutError> {
        validate_customer(customer)?;
        if lines.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let mut report = AssemblyReport::default();
        let mut shipping_pending = shipping_cost;

        for (line_index, line) in lines.iter().enumerate() {
            for unit_index in 0..line.quantity {
                let shipping = std::mem::take(&mut shipping_pending);
                let order = build_order(line, customer, fulfillment, shipping);

                match self.repo.create_order(&order).await {
                    Ok(order_number) => {
                        if order.shipping_cost > 0 {
                            report.shipping_carried_by = Some(order_number.clone());
                        }
                        report.events.push(OrderPlacedEvent {
                            order_id: order.id,
                            order_number: order_number.clone(),
                            customer_email: customer.email.clone(),
                            total_amount: order.total_amount,
                            placed_at: order.created_at.timestamp(),
                        });
                        report.order_numbers.push(order_number);
                    }
                    Err(e) => {
                        tracing::error!(
                            "Order creation failed for line {} unit {}: {}",
                            line_index,
                            unit_index,
                            e
                        );
                        // The shipping charge must still land on a created
                        // row, so put it back for the next unit.
                        if shipping > 0 {
                            shipping_pending = shipping;
                        }
                        report.failures.push(AssemblyFailure {
                            line_index,
                            unit_index,
                            error: e.to_string(),
                        });
                    }
                }
            }
        }

        tracing::info!(
            "Checkout assembled {} order(s), {} failure(s)",
            report.order_numbers.len(),
            report.failures.len()
        );
        Ok(report)
    }
}

/// Required before any gateway call; nothing is persisted on failure.
pub fn validate_customer(customer: &Customer) -> Result<(), CheckoutError> {
    let mut missing = Vec::new();
    if customer.name.trim().is_empty() {
        missing.push("name");
    }
    if customer.email.trim().is_empty() {
        missing.push("email");
    }
    if customer.phone.trim().is_empty() {
        missing.push("phone");
    }
    if missing.is_empty() {
        Ok(())
    } else {
        Err(CheckoutError::Validation { missing })
    }
}

fn build_order(
    line: &CartLine,
    customer: &Customer,
    fulfillment: &Fulfillment,
    shipping_cost: Cents,
) -> Order {
    let id = Uuid::new_v4();
    Order {
        id,
        order_number: generate_order_number(&id),
        status: OrderStatus::Pending,
        customer: customer.clone(),
        fulfillment: fulfillment.clone(),
        product_id: line.product_id,
        product_name: line.product_name.clone(),
        selected_material: line.selected_material.clone(),
        selected_size: line.selected_size,
        selected_colors: line.selected_colors.clone(),
        customization_text: line.customization_text.clone(),
        product_price: line.unit_price,
        shipping_cost,
        total_amount: line.unit_price + shipping_cost,
        print_priority: None,
        created_at: Utc::now(),
    }
}

/// Format: FAB-{timestamp}-{short_uuid}
fn generate_order_number(order_id: &Uuid) -> String {
    let timestamp = Utc::now().timestamp();
    let short_id = &order_id.simple().to_string()[..8];
    format!("FAB-{}-{}", timestamp, short_id.to_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MemoryOrderRepository;

    fn customer() -> Customer {
        Customer {
            name: "Dana Whitfield".to_string(),
            email: "dana@example.com".to_string(),
            phone: "555-0100".to_string(),
        }
    }

    fn line(quantity: u32, unit_price: Cents) -> CartLine {
        CartLine {
            id: Uuid::new_v4(),
            product_id: Uuid::new_v4(),
            product_name: "Hex Vase".to_string(),
            quantity,
            selected_material: Some("PLA".to_string()),
            selected_size: None,
            selected_colors: vec!["Forest Green".to_string()],
            customization_text: None,
            unit_price,
        }
    }

    fn shipping() -> Fulfillment {
        Fulfillment::Shipping {
            address: "12 Printer Way, Seattle, WA".to_string(),
        }
    }

    #[tokio::test]
    async fn test_one_row_per_unit() {
        let repo = Arc::new(MemoryOrderRepository::new());
        let assembler = OrderAssembler::new(repo.clone());

        let report = assembler
            .assemble(&[line(3, 1000), line(1, 500)], &customer(), &shipping(), 0)
            .await
            .unwrap();

        assert!(report.is_complete());
        assert_eq!(report.order_numbers.len(), 4);
        assert_eq!(repo.all_orders().len(), 4);
        assert_eq!(report.events.len(), 4);
    }

    #[tokio::test]
    async fn test_shipping_on_first_row_only() {
        let repo = Arc::new(MemoryOrderRepository::new());
        let assembler = OrderAssembler::new(repo.clone());

        let report = assembler
            .assemble(&[line(2, 1000)], &customer(), &shipping(), 750)
            .await
            .unwrap();

        let orders = repo.all_orders();
        assert_eq!(orders[0].shipping_cost, 750);
        assert_eq!(orders[0].total_amount, 1750);
        assert_eq!(orders[1].shipping_cost, 0);
        assert_eq!(orders[1].total_amount, 1000);
        assert_eq!(
            report.shipping_carried_by.as_deref(),
            Some(orders[0].order_number.as_str())
        );
    }

    #[tokio::test]
    async fn test_partial_failure_keeps_created_rows() {
        let repo = Arc::new(MemoryOrderRepository::failing_creates_after(2));
        let assembler = OrderAssembler::new(repo.clone());

        let report = assembler
            .assemble(&[line(4, 1000)], &customer(), &shipping(), 0)
            .await
            .unwrap();

        assert_eq!(report.order_numbers.len(), 2);
        assert_eq!(report.failures.len(), 2);
        assert_eq!(repo.all_orders().len(), 2);
        assert_eq!(report.failures[0].unit_index, 2);
    }

    #[tokio::test]
    async fn test_validation_blocks_before_any_create() {
        let repo = Arc::new(MemoryOrderRepository::new());
        let assembler = OrderAssembler::new(repo.clone());

        let incomplete = Customer {
            name: String::new(),
            email: "dana@example.com".to_string(),
            phone: String::new(),
        };
        let err = assembler
            .assemble(&[line(1, 1000)], &incomplete, &shipping(), 0)
            .await
            .unwrap_err();

        match err {
            CheckoutError::Validation { missing } => {
                assert_eq!(missing, vec!["name", "phone"]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(repo.all_orders().is_empty());
    }

    #[tokio::test]
    async fn test_pickup_orders_store_zone_sentinel() {
        let repo = Arc::new(MemoryOrderRepository::new());
        let assembler = OrderAssembler::new(repo.clone());

        let pickup = Fulfillment::Pickup {
            zone: "Alpharetta, Georgia".to_string(),
        };
        assembler
            .assemble(&[line(1, 1000)], &customer(), &pickup, 0)
            .await
            .unwrap();

        let orders = repo.all_orders();
        assert_eq!(
            orders[0].fulfillment.storage_address(),
            "PICKUP - Alpharetta, Georgia"
        );
    }
}
