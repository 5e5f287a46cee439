// stockline/src/error.rs
use anyhow::Error as AnyhowError;
use thiserror::Error;

use crate::model::{OrderStatus, ProductId, VariantId};

#[derive(Debug, Error)]
pub enum OrderError {
  #[error("Variant not found: {variant_id}")]
  VariantNotFound { variant_id: VariantId },

  #[error("Product is not available for sale: {product_name} (id {product_id})")]
  ProductInactive { product_id: ProductId, product_name: String },

  #[error("Insufficient stock for {variant_name} (variant {variant_id}): requested {requested}, available {available}")]
  InsufficientStock {
    variant_id: VariantId,
    variant_name: String,
    requested: i32,
    available: i32,
  },

  // Deliberately carries no id: missing and not-owned must look the same.
  #[error("Order not found")]
  OrderNotFound,

  #[error("Invalid order status: '{0}'")]
  InvalidStatus(String),

  #[error("Order can no longer be cancelled (status: {status})")]
  CannotCancel { status: OrderStatus },

  #[error("Status transition not allowed: {from} -> {to}")]
  TransitionNotAllowed { from: OrderStatus, to: OrderStatus },

  #[error("Validation error: {0}")]
  Validation(String),

  #[error("Storage failure. Source: {source}")]
  Storage {
    #[source]
    source: AnyhowError,
  },
}

impl OrderError {
  pub fn storage(message: impl Into<String>) -> Self {
    OrderError::Storage {
      source: AnyhowError::msg(message.into()),
    }
  }

  /// True for the kinds a caller caused (bad input, business rule), false for storage trouble.
  pub fn is_client_error(&self) -> bool {
    !matches!(self, OrderError::Storage { .. })
  }
}

// Store adapters and notifiers report through anyhow; inside the engine that is a storage failure.
impl From<AnyhowError> for OrderError {
  fn from(err: AnyhowError) -> Self {
    match err.downcast::<OrderError>() {
      Ok(order_err) => order_err,
      Err(err) => OrderError::Storage { source: err },
    }
  }
}

pub type OrderResult<T, E = OrderError> = std::result::Result<T, E>;
