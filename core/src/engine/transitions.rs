// stockline/src/engine/transitions.rs

use tracing::{debug, info, instrument, warn};

use super::{quantities_by_variant, settle, OrderEngine};
use crate::error::{OrderError, OrderResult};
use crate::model::{CustomerId, Order, OrderId, OrderStatus};
use crate::notify::OrderEvent;
use crate::status::customer_can_cancel;
use crate::store::OrderTransaction;
use crate::DEFAULT_CANCEL_REASON;

impl OrderEngine {
  /// Administrative status change. `new_status` must name a known status and the
  /// transition table must allow the move; stock is never touched here.
  #[instrument(name = "OrderEngine::update_status", skip(self), err(Display))]
  pub async fn update_status(&self, order_id: OrderId, new_status: &str) -> OrderResult<Order> {
    let target: OrderStatus = new_status.parse()?;

    let mut tx = self.store.begin().await?;
    let outcome = self.update_status_within(tx.as_mut(), order_id, target).await;
    let (previous, order) = settle(tx, outcome).await?;

    info!(order_id, from = %previous, to = %target, "Order status changed.");
    self.notify(OrderEvent::StatusChanged {
      order: order.clone(),
      new_status: target,
    });
    Ok(order)
  }

  async fn update_status_within(
    &self,
    tx: &mut dyn OrderTransaction,
    order_id: OrderId,
    target: OrderStatus,
  ) -> OrderResult<(OrderStatus, Order)> {
    let current = tx
      .lock_order(order_id, None)
      .await?
      .ok_or(OrderError::OrderNotFound)?
      .order
      .status;
    self.transitions.check(current, target)?;
    let order = tx.set_status(order_id, target, None).await?;
    Ok((current, order))
  }

  /// Customer cancellation: restocks every stock-tracked line (ascending variant order,
  /// like placement) and marks the order cancelled in one unit of work. Refused once the order is shipped, delivered or
  /// already cancelled.
  #[instrument(name = "OrderEngine::cancel_order", skip(self), err(Display))]
  pub async fn cancel_order(&self, order_id: OrderId, owner: CustomerId, reason: Option<&str>) -> OrderResult<Order> {
    let reason = reason
      .map(str::trim)
      .filter(|r| !r.is_empty())
      .unwrap_or(DEFAULT_CANCEL_REASON);

    let mut tx = self.store.begin().await?;
    let outcome = self.cancel_within(tx.as_mut(), order_id, owner, reason).await;
    let order = settle(tx, outcome).await?;

    info!(order_id, owner, "Order cancelled by customer.");
    self.notify(OrderEvent::StatusChanged {
      order: order.clone(),
      new_status: OrderStatus::Cancelled,
    });
    Ok(order)
  }

  async fn cancel_within(
    &self,
    tx: &mut dyn OrderTransaction,
    order_id: OrderId,
    owner: CustomerId,
    reason: &str,
  ) -> OrderResult<Order> {
    let locked = tx.lock_order(order_id, Some(owner)).await?.ok_or_else(|| {
      warn!(order_id, owner, "Cancellation for a missing or foreign order.");
      OrderError::OrderNotFound
    })?;

    let status = locked.order.status;
    if !customer_can_cancel(status) {
      warn!(order_id, %status, "Cancellation refused.");
      return Err(OrderError::CannotCancel { status });
    }

    let restock = quantities_by_variant(locked.items.iter().map(|item| (item.variant_id, item.quantity)));
    for (&variant_id, &quantity) in &restock {
      let Some(view) = tx.variant_with_product(variant_id).await? else {
        warn!(variant_id, "Variant no longer exists; nothing to restock.");
        continue;
      };
      if !view.has_stock_tracking {
        continue;
      }
      let restocked = tx
        .adjust_stock(variant_id, quantity)
        .await?
        .ok_or_else(|| OrderError::storage(format!("restock of variant {variant_id} was refused")))?;
      debug!(variant_id, quantity, restocked, "Stock restored.");
    }

    tx.set_status(order_id, OrderStatus::Cancelled, Some(reason)).await
  }
}
