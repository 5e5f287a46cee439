// stockline/src/status.rs

//! The order state machine, written as data. Administrative updates consult a
//! [`TransitionTable`]; customer cancellation has its own guard.

use std::collections::{HashMap, HashSet};

use crate::error::{OrderError, OrderResult};
use crate::model::OrderStatus;

/// Statuses from which a customer may no longer cancel.
pub const CANCEL_BLOCKING: [OrderStatus; 3] = [OrderStatus::Shipped, OrderStatus::Delivered, OrderStatus::Cancelled];

pub const INITIAL_STATUS: OrderStatus = OrderStatus::Pending;

pub fn customer_can_cancel(status: OrderStatus) -> bool {
  !CANCEL_BLOCKING.contains(&status)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionTable {
  allowed: HashMap<OrderStatus, HashSet<OrderStatus>>,
}

impl TransitionTable {
  /// Every status may move to every other one (administrative correction).
  pub fn permissive() -> Self {
    let allowed = OrderStatus::ALL
      .into_iter()
      .map(|from| (from, OrderStatus::ALL.into_iter().collect()))
      .collect();
    Self { allowed }
  }

  /// A table with no transitions; build it up with [`TransitionTable::allow`].
  pub fn empty() -> Self {
    Self { allowed: HashMap::new() }
  }

  pub fn allow(mut self, from: OrderStatus, targets: &[OrderStatus]) -> Self {
    self.allowed.entry(from).or_default().extend(targets.iter().copied());
    self
  }

  pub fn is_allowed(&self, from: OrderStatus, to: OrderStatus) -> bool {
    self.allowed.get(&from).is_some_and(|targets| targets.contains(&to))
  }

  pub fn check(&self, from: OrderStatus, to: OrderStatus) -> OrderResult<()> {
    if self.is_allowed(from, to) {
      Ok(())
    } else {
      Err(OrderError::TransitionNotAllowed { from, to })
    }
  }
}

impl Default for TransitionTable {
  fn default() -> Self {
    Self::permissive()
  }
}
