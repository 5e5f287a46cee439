// stockline/src/model/order.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::{CustomerId, OrderId, OrderItemId, ProductId, VariantId};
use crate::error::{OrderError, OrderResult};
use crate::pricing::OrderTotals;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
  Pending,
  Preparing,
  Shipped,
  Delivered,
  Cancelled,
  Returned,
}

impl OrderStatus {
  pub const ALL: [OrderStatus; 6] = [
    OrderStatus::Pending,
    OrderStatus::Preparing,
    OrderStatus::Shipped,
    OrderStatus::Delivered,
    OrderStatus::Cancelled,
    OrderStatus::Returned,
  ];

  pub fn as_str(&self) -> &'static str {
    match self {
      OrderStatus::Pending => "pending",
      OrderStatus::Preparing => "preparing",
      OrderStatus::Shipped => "shipped",
      OrderStatus::Delivered => "delivered",
      OrderStatus::Cancelled => "cancelled",
      OrderStatus::Returned => "returned",
    }
  }
}

impl fmt::Display for OrderStatus {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for OrderStatus {
  type Err = OrderError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    OrderStatus::ALL
      .into_iter()
      .find(|status| status.as_str() == s)
      .ok_or_else(|| OrderError::InvalidStatus(s.to_string()))
  }
}

/// Recorded on the order; no payment is processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentMethod {
  #[serde(rename = "cod")]
  CashOnDelivery,
  #[serde(rename = "transfer")]
  BankTransfer,
}

impl PaymentMethod {
  pub fn as_str(&self) -> &'static str {
    match self {
      PaymentMethod::CashOnDelivery => "cod",
      PaymentMethod::BankTransfer => "transfer",
    }
  }
}

impl fmt::Display for PaymentMethod {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for PaymentMethod {
  type Err = OrderError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "cod" => Ok(PaymentMethod::CashOnDelivery),
      "transfer" => Ok(PaymentMethod::BankTransfer),
      other => Err(OrderError::Validation(format!("Unknown payment method: '{}'", other))),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
  pub id: OrderId,
  pub customer_id: Option<CustomerId>,
  /// Tracking token, the only credential needed for guest lookup.
  pub order_number: Uuid,
  pub contact_email: String,
  pub shipping_name: String,
  pub shipping_phone: String,
  pub shipping_address: String,
  pub shipping_city: String,
  pub subtotal: Decimal,
  pub shipping_cost: Decimal,
  pub final_amount: Decimal,
  pub payment_method: PaymentMethod,
  pub status: OrderStatus,
  pub cancel_reason: Option<String>,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl Order {
  pub fn totals(&self) -> OrderTotals {
    OrderTotals {
      subtotal: self.subtotal,
      shipping_cost: self.shipping_cost,
      final_amount: self.final_amount,
    }
  }

  pub fn is_owned_by(&self, owner: CustomerId) -> bool {
    self.customer_id == Some(owner)
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
  pub id: OrderItemId,
  pub order_id: OrderId,
  pub product_id: ProductId,
  pub variant_id: VariantId,
  pub quantity: i32,
  /// Price captured at placement; never follows later catalog changes.
  pub unit_price: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderWithItems {
  #[serde(flatten)]
  pub order: Order,
  pub items: Vec<OrderItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
  pub variant_id: VariantId,
  pub quantity: i32,
}

impl CartLine {
  pub fn new(variant_id: VariantId, quantity: i32) -> Self {
    Self { variant_id, quantity }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingInfo {
  pub full_name: String,
  pub phone: String,
  pub address: String,
  pub city: String,
}

/// The authenticated caller placing or managing an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
  pub id: CustomerId,
  pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
  #[serde(alias = "items")]
  pub lines: Vec<CartLine>,
  #[serde(alias = "shippingInfo")]
  pub shipping: ShippingInfo,
  pub payment_method: PaymentMethod,
  #[serde(default)]
  pub contact_email: Option<String>,
}

impl OrderRequest {
  /// Checks the request shape and resolves the contact email: the actor's when
  /// authenticated, otherwise the one supplied with the request.
  pub fn validate(&self, actor: Option<&Customer>) -> OrderResult<String> {
    validate_cart_lines(&self.lines)?;

    let shipping = &self.shipping;
    for (field, value) in [
      ("fullName", &shipping.full_name),
      ("phone", &shipping.phone),
      ("address", &shipping.address),
      ("city", &shipping.city),
    ] {
      if value.trim().is_empty() {
        return Err(OrderError::Validation(format!("Shipping field '{}' is required.", field)));
      }
    }

    let email = match actor {
      Some(customer) => customer.email.trim().to_string(),
      None => self.contact_email.as_deref().unwrap_or_default().trim().to_string(),
    };
    if email.is_empty() || !email.contains('@') {
      return Err(OrderError::Validation("A valid contact email is required.".to_string()));
    }
    Ok(email)
  }
}

pub(crate) fn validate_cart_lines(lines: &[CartLine]) -> OrderResult<()> {
  if lines.is_empty() {
    return Err(OrderError::Validation("Cart must contain at least one line.".to_string()));
  }
  if let Some(bad) = lines.iter().find(|line| line.quantity < 1) {
    return Err(OrderError::Validation(format!(
      "Quantity for variant {} must be at least 1 (got {}).",
      bad.variant_id, bad.quantity
    )));
  }
  Ok(())
}

/// Everything the store needs to persist a fresh order row. The store assigns
/// the id, timestamps and the initial `pending` status.
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrder {
  pub customer_id: Option<CustomerId>,
  pub order_number: Uuid,
  pub contact_email: String,
  pub shipping: ShippingInfo,
  pub totals: OrderTotals,
  pub payment_method: PaymentMethod,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewOrderItem {
  pub product_id: ProductId,
  pub variant_id: VariantId,
  pub quantity: i32,
  pub unit_price: Decimal,
}
