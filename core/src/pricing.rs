// stockline/src/pricing.rs

//! Pure currency arithmetic shared by preview and placement, so both produce identical
//! totals for the same catalog state. All amounts are `Decimal`, never floats.

use parking_lot::RwLock;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::{OrderError, OrderResult};

/// Currency amounts are persisted with two decimal places.
pub const CURRENCY_SCALE: u32 = 2;

pub fn round_currency(amount: Decimal) -> Decimal {
  amount.round_dp_with_strategy(CURRENCY_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PricedLine {
  pub unit_price: Decimal,
  pub quantity: i32,
}

impl PricedLine {
  pub fn new(unit_price: Decimal, quantity: i32) -> Self {
    Self { unit_price, quantity }
  }

  pub fn line_total(&self) -> Decimal {
    self.unit_price * Decimal::from(self.quantity)
  }
}

/// `Σ(unit_price × quantity)`.
pub fn subtotal<'a>(lines: impl IntoIterator<Item = &'a PricedLine>) -> Decimal {
  round_currency(lines.into_iter().map(PricedLine::line_total).sum())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingPolicy {
  pub flat_fee: Decimal,
  pub free_threshold: Decimal,
}

impl ShippingPolicy {
  pub fn new(flat_fee: Decimal, free_threshold: Decimal) -> OrderResult<Self> {
    if flat_fee.is_sign_negative() || free_threshold.is_sign_negative() {
      return Err(OrderError::Validation(
        "Shipping fee and free-shipping threshold must not be negative.".to_string(),
      ));
    }
    Ok(Self {
      flat_fee: round_currency(flat_fee),
      free_threshold: round_currency(free_threshold),
    })
  }

  /// Free at or above the threshold, flat fee below it.
  pub fn shipping_for(&self, subtotal: Decimal) -> Decimal {
    if subtotal >= self.free_threshold {
      Decimal::ZERO
    } else {
      self.flat_fee
    }
  }

  pub fn quote(&self, subtotal: Decimal) -> OrderTotals {
    let subtotal = round_currency(subtotal);
    let shipping_cost = self.shipping_for(subtotal);
    OrderTotals {
      subtotal,
      shipping_cost,
      final_amount: subtotal + shipping_cost,
    }
  }
}

impl Default for ShippingPolicy {
  fn default() -> Self {
    Self {
      flat_fee: Decimal::new(5000, 2),
      free_threshold: Decimal::new(100000, 2),
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderTotals {
  pub subtotal: Decimal,
  pub shipping_cost: Decimal,
  pub final_amount: Decimal,
}

impl OrderTotals {
  pub fn is_free_shipping(&self) -> bool {
    self.shipping_cost.is_zero()
  }

  /// `final_amount == subtotal + shipping_cost`.
  pub fn reconciles(&self) -> bool {
    self.final_amount == self.subtotal + self.shipping_cost
  }
}

/// Shared, live-tunable shipping configuration. Every pricing calculation reads the
/// current value; nothing caches it.
///
/// Guards are `parking_lot` locks and are never held across `.await`.
#[derive(Debug, Clone, Default)]
pub struct ShippingSettings(Arc<RwLock<ShippingPolicy>>);

impl ShippingSettings {
  pub fn new(policy: ShippingPolicy) -> Self {
    ShippingSettings(Arc::new(RwLock::new(policy)))
  }

  pub fn current(&self) -> ShippingPolicy {
    *self.0.read()
  }

  /// Replaces the policy, returning the previous one.
  pub fn replace(&self, policy: ShippingPolicy) -> ShippingPolicy {
    std::mem::replace(&mut *self.0.write(), policy)
  }
}
