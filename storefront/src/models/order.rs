// storefront/src/models/order.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::FromRow;
use uuid::Uuid;

use stockline::{Order, OrderError, OrderItem};

// Status and payment method are stored as CHECK-constrained text.
#[derive(Debug, Clone, FromRow)]
pub struct OrderRow {
  pub id: i64,
  pub customer_id: Option<i64>,
  pub order_number: Uuid,
  pub contact_email: String,
  pub shipping_name: String,
  pub shipping_phone: String,
  pub shipping_address: String,
  pub shipping_city: String,
  pub subtotal: Decimal,
  pub shipping_cost: Decimal,
  pub final_amount: Decimal,
  pub payment_method: String,
  pub status: String,
  pub cancel_reason: Option<String>,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl TryFrom<OrderRow> for Order {
  type Error = OrderError;

  fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
    // A bad value here means the table was written around the engine.
    let status = row
      .status
      .parse()
      .map_err(|_| OrderError::storage(format!("order {} has unknown status '{}'", row.id, row.status)))?;
    let payment_method = row.payment_method.parse().map_err(|_| {
      OrderError::storage(format!(
        "order {} has unknown payment method '{}'",
        row.id, row.payment_method
      ))
    })?;
    Ok(Order {
      id: row.id,
      customer_id: row.customer_id,
      order_number: row.order_number,
      contact_email: row.contact_email,
      shipping_name: row.shipping_name,
      shipping_phone: row.shipping_phone,
      shipping_address: row.shipping_address,
      shipping_city: row.shipping_city,
      subtotal: row.subtotal,
      shipping_cost: row.shipping_cost,
      final_amount: row.final_amount,
      payment_method,
      status,
      cancel_reason: row.cancel_reason,
      created_at: row.created_at,
      updated_at: row.updated_at,
    })
  }
}

#[derive(Debug, Clone, FromRow)]
pub struct OrderItemRow {
  pub id: i64,
  pub order_id: i64,
  pub product_id: i64,
  pub variant_id: i64,
  pub quantity: i32,
  pub unit_price: Decimal,
}

impl From<OrderItemRow> for OrderItem {
  fn from(row: OrderItemRow) -> Self {
    OrderItem {
      id: row.id,
      order_id: row.order_id,
      product_id: row.product_id,
      variant_id: row.variant_id,
      quantity: row.quantity,
      unit_price: row.unit_price,
    }
  }
}
