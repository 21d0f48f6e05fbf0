use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use fab_core::repository::RepoError;
use fab_order::models::{Customer, Fulfillment, FulfillmentKind, Order, OrderStatus};
use fab_order::repository::OrderRepository;

use fab_catalog::product::PrintSize;

const ORDER_COLUMNS: &str = "id, order_number, status, customer_name, customer_email, \
     customer_phone, fulfillment_kind, delivery_address, product_id, product_name, \
     selected_material, selected_size, selected_colors, customization_text, \
     product_price_cents, shipping_cost_cents, total_amount_cents, print_priority, created_at";

pub struct StoreOrderRepository {
    pool: PgPool,
}

impl StoreOrderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Undefined-column SQLSTATE maps to the one schema error the schedule
/// screen special-cases; everything else is a generic backend failure.
fn map_err(e: sqlx::Error) -> RepoError {
    if let sqlx::Error::Database(db) = &e {
        if db.code().as_deref() == Some("42703") {
            return RepoError::MissingPriorityColumn;
        }
    }
    RepoError::Backend(e.to_string())
}

fn decode(row: &PgRow) -> Result<Order, RepoError> {
    let status_raw: String = row.try_get("status").map_err(map_row)?;
    let kind_raw: String = row.try_get("fulfillment_kind").map_err(map_row)?;
    let kind = match kind_raw.as_str() {
        "pickup" => FulfillmentKind::Pickup,
        "delivery" => FulfillmentKind::Delivery,
        _ => FulfillmentKind::Shipping,
    };
    let stored_address: String = row.try_get("delivery_address").map_err(map_row)?;

    let size_raw: Option<String> = row.try_get("selected_size").map_err(map_row)?;
    let colors_raw: serde_json::Value = row.try_get("selected_colors").map_err(map_row)?;

    Ok(Order {
        id: row.try_get("id").map_err(map_row)?,
        order_number: row.try_get("order_number").map_err(map_row)?,
        status: OrderStatus::parse(&status_raw).unwrap_or(OrderStatus::Pending),
        customer: Customer {
            name: row.try_get("customer_name").map_err(map_row)?,
            email: row.try_get("customer_email").map_err(map_row)?,
            phone: row.try_get("customer_phone").map_err(map_row)?,
        },
        fulfillment: Fulfillment::from_storage(kind, &stored_address),
        product_id: row.try_get("product_id").map_err(map_row)?,
        product_name: row.try_get("product_name").map_err(map_row)?,
        selected_material: row.try_get("selected_material").map_err(map_row)?,
        selected_size: size_raw.as_deref().and_then(PrintSize::parse),
        selected_colors: serde_json::from_value(colors_raw).unwrap_or_default(),
        customization_text: row.try_get("customization_text").map_err(map_row)?,
        product_price: row.try_get("product_price_cents").map_err(map_row)?,
        shipping_cost: row.try_get("shipping_cost_cents").map_err(map_row)?,
        total_amount: row.try_get("total_amount_cents").map_err(map_row)?,
        print_priority: row.try_get("print_priority").map_err(map_row)?,
        created_at: row.try_get("created_at").map_err(map_row)?,
    })
}

fn map_row(e: sqlx::Error) -> RepoError {
    RepoError::Backend(e.to_string())
}

#[async_trait]
impl OrderRepository for StoreOrderRepository {
    async fn create_order(&self, order: &Order) -> Result<String, RepoError> {
        sqlx::query(
            r#"
            INSERT INTO orders (id, order_number, status, customer_name, customer_email,
                customer_phone, fulfillment_kind, delivery_address, product_id, product_name,
                selected_material, selected_size, selected_colors, customization_text,
                product_price_cents, shipping_cost_cents, total_amount_cents, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18)
            "#,
        )
        .bind(order.id)
        .bind(&order.order_number)
        .bind(order.status.as_str())
        .bind(&order.customer.name)
        .bind(&order.customer.email)
        .bind(&order.customer.phone)
        .bind(match order.fulfillment.kind() {
            FulfillmentKind::Pickup => "pickup",
            FulfillmentKind::Delivery => "delivery",
            FulfillmentKind::Shipping => "shipping",
        })
        .bind(order.fulfillment.storage_address())
        .bind(order.product_id)
        .bind(&order.product_name)
        .bind(&order.selected_material)
        .bind(order.selected_size.map(|s| s.as_str()))
        .bind(serde_json::json!(order.selected_colors))
        .bind(&order.customization_text)
        .bind(order.product_price)
        .bind(order.shipping_cost)
        .bind(order.total_amount)
        .bind(order.created_at)
        .execute(&self.pool)
        .await
        .map_err(map_err)?;

        Ok(order.order_number.clone())
    }

    async fn update_order_status(&self, id: Uuid, status: OrderStatus) -> Result<(), RepoError> {
        let result = sqlx::query("UPDATE orders SET status = $1 WHERE id = $2")
            .bind(status.as_str())
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_err)?;

        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound(id.to_string()));
        }
        Ok(())
    }

    async fn update_print_priority(&self, id: Uuid, priority: i32) -> Result<(), RepoError> {
        let result = sqlx::query("UPDATE orders SET print_priority = $1 WHERE id = $2")
            .bind(priority)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_err)?;

        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound(id.to_string()));
        }
        Ok(())
    }

    async fn list_active_orders(&self) -> Result<Vec<Order>, RepoError> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM orders WHERE status IN ('pending', 'confirmed', 'printing', 'finishing') \
             ORDER BY created_at",
            ORDER_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(map_err)?;

        rows.iter().map(decode).collect()
    }

    async fn get_order(&self, id: Uuid) -> Result<Option<Order>, RepoError> {
        let row = sqlx::query(&format!("SELECT {} FROM orders WHERE id = $1", ORDER_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_err)?;

        row.as_ref().map(decode).transpose()
    }
}
