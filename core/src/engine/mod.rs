// stockline/src/engine/mod.rs

//! The [`OrderEngine`]: sole writer of orders, order items and variant stock.
//!
//! - `placement.rs` holds order creation.
//! - `transitions.rs` holds administrative status updates and customer cancellation.
//! - Read paths (tracking, owner lookup, listings) live here.

mod placement;
mod transitions;

use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{error, instrument, warn};
use uuid::Uuid;

use crate::error::{OrderError, OrderResult};
use crate::model::{CartLine, CustomerId, Order, OrderId, OrderWithItems, VariantId};
use crate::notify::{NotificationDispatcher, Notifier, OrderEvent};
use crate::preview::{CartPreview, CartPreviewService};
use crate::pricing::ShippingSettings;
use crate::status::TransitionTable;
use crate::store::{OrderFilter, OrderLookup, OrderStore, OrderTransaction, Page};

#[derive(Clone)]
pub struct OrderEngine {
  store: Arc<dyn OrderStore>,
  shipping: ShippingSettings,
  transitions: TransitionTable,
  preview: CartPreviewService,
  notifications: NotificationDispatcher,
}

impl OrderEngine {
  pub fn new(store: Arc<dyn OrderStore>, shipping: ShippingSettings, notifier: Arc<dyn Notifier>) -> Self {
    let preview = CartPreviewService::new(Arc::clone(&store), shipping.clone());
    Self {
      store,
      shipping,
      transitions: TransitionTable::permissive(),
      preview,
      notifications: NotificationDispatcher::new(notifier),
    }
  }

  /// Replaces the administrative transition table (permissive by default).
  pub fn with_transitions(mut self, transitions: TransitionTable) -> Self {
    self.transitions = transitions;
    self
  }

  pub fn shipping(&self) -> &ShippingSettings {
    &self.shipping
  }

  pub async fn preview_cart(&self, lines: &[CartLine]) -> OrderResult<CartPreview> {
    self.preview.preview(lines).await
  }

  /// Guest lookup: the tracking token is the credential, no ownership check.
  #[instrument(name = "OrderEngine::track_order", skip(self), err(Display))]
  pub async fn track_order(&self, token: Uuid) -> OrderResult<OrderWithItems> {
    self
      .store
      .find_order(OrderLookup::Token(token))
      .await?
      .ok_or(OrderError::OrderNotFound)
  }

  /// Owner-scoped lookup. A foreign order is reported exactly like a missing one.
  #[instrument(name = "OrderEngine::get_order", skip(self), err(Display))]
  pub async fn get_order(&self, order_id: OrderId, owner: CustomerId) -> OrderResult<OrderWithItems> {
    match self.store.find_order(OrderLookup::OwnedBy { order_id, owner }).await? {
      Some(order) => Ok(order),
      None => {
        warn!(order_id, owner, "Order lookup outside ownership or for a missing order.");
        Err(OrderError::OrderNotFound)
      }
    }
  }

  /// Administrative lookup without ownership scoping.
  #[instrument(name = "OrderEngine::get_order_admin", skip(self), err(Display))]
  pub async fn get_order_admin(&self, order_id: OrderId) -> OrderResult<OrderWithItems> {
    self
      .store
      .find_order(OrderLookup::Id(order_id))
      .await?
      .ok_or(OrderError::OrderNotFound)
  }

  #[instrument(name = "OrderEngine::list_orders_for_owner", skip(self), err(Display))]
  pub async fn list_orders_for_owner(&self, owner: CustomerId) -> OrderResult<Vec<Order>> {
    self.store.list_orders_for_owner(owner).await
  }

  #[instrument(name = "OrderEngine::list_orders", skip(self), err(Display))]
  pub async fn list_orders(&self, filter: OrderFilter) -> OrderResult<Page<Order>> {
    self.store.list_orders(&filter).await
  }

  fn notify(&self, event: OrderEvent) {
    self.notifications.dispatch(event);
  }
}

impl std::fmt::Debug for OrderEngine {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("OrderEngine")
      .field("shipping", &self.shipping.current())
      .field("transitions", &self.transitions)
      .finish_non_exhaustive()
  }
}

/// Ends a unit of work: commits a successful outcome, rolls back a failed one (including
/// a failed commit). A failed rollback is logged; the caller sees the original error.
async fn settle<T>(mut tx: Box<dyn OrderTransaction>, outcome: OrderResult<T>) -> OrderResult<T> {
  let outcome = match outcome {
    Ok(value) => tx.commit().await.map(|()| value),
    Err(e) => Err(e),
  };
  if outcome.is_err() {
    if let Err(rollback_err) = tx.rollback().await {
      error!(error = %rollback_err, "Rollback failed; the store discards the transaction on drop.");
    }
  }
  outcome
}

/// Total quantity per variant, keyed in ascending variant order. Every transaction walks
/// stock rows in this order so concurrent multi-line orders take row locks consistently.
fn quantities_by_variant(lines: impl IntoIterator<Item = (VariantId, i32)>) -> BTreeMap<VariantId, i32> {
  let mut totals = BTreeMap::new();
  for (variant_id, quantity) in lines {
    let total: &mut i32 = totals.entry(variant_id).or_insert(0);
    *total = total.saturating_add(quantity);
  }
  totals
}
