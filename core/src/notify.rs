// stockline/src/notify.rs

//! Post-commit notifications. Delivery is best-effort and at-most-once: each event runs
//! in its own detached task, and a failure is logged where it happens instead of
//! reaching the operation that produced the event.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, error, info_span, warn, Instrument};

use crate::model::{Order, OrderStatus};

#[async_trait]
pub trait Notifier: Send + Sync {
  /// Confirmation to the customer who placed `order`.
  async fn order_confirmed(&self, order: &Order) -> anyhow::Result<()>;

  /// New-order alert to operations.
  async fn admin_new_order(&self, order: &Order) -> anyhow::Result<()>;

  async fn status_changed(&self, order: &Order, new_status: OrderStatus) -> anyhow::Result<()>;
}

/// A committed order snapshot plus what happened to it.
#[derive(Debug, Clone, PartialEq)]
pub enum OrderEvent {
  Confirmed(Order),
  AdminNewOrder(Order),
  StatusChanged { order: Order, new_status: OrderStatus },
}

impl OrderEvent {
  pub fn kind(&self) -> &'static str {
    match self {
      OrderEvent::Confirmed(_) => "order_confirmed",
      OrderEvent::AdminNewOrder(_) => "admin_new_order",
      OrderEvent::StatusChanged { .. } => "status_changed",
    }
  }

  pub fn order(&self) -> &Order {
    match self {
      OrderEvent::Confirmed(order) | OrderEvent::AdminNewOrder(order) => order,
      OrderEvent::StatusChanged { order, .. } => order,
    }
  }

  async fn deliver(&self, notifier: &dyn Notifier) -> anyhow::Result<()> {
    match self {
      OrderEvent::Confirmed(order) => notifier.order_confirmed(order).await,
      OrderEvent::AdminNewOrder(order) => notifier.admin_new_order(order).await,
      OrderEvent::StatusChanged { order, new_status } => notifier.status_changed(order, *new_status).await,
    }
  }
}

#[derive(Clone)]
pub struct NotificationDispatcher {
  notifier: Arc<dyn Notifier>,
}

impl NotificationDispatcher {
  pub fn new(notifier: Arc<dyn Notifier>) -> Self {
    Self { notifier }
  }

  /// Fires `event` on a detached task and returns immediately.
  pub fn dispatch(&self, event: OrderEvent) {
    let handle = match tokio::runtime::Handle::try_current() {
      Ok(handle) => handle,
      Err(_) => {
        warn!(kind = event.kind(), order_id = event.order().id, "No async runtime; notification dropped.");
        return;
      }
    };

    let notifier = Arc::clone(&self.notifier);
    let span = info_span!("notification", kind = event.kind(), order_id = event.order().id);
    handle.spawn(
      async move {
        match event.deliver(notifier.as_ref()).await {
          Ok(()) => debug!("Notification delivered."),
          Err(e) => error!(error = %e, "Notification delivery failed."),
        }
      }
      .instrument(span),
    );
  }
}

impl std::fmt::Debug for NotificationDispatcher {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("NotificationDispatcher").finish_non_exhaustive()
  }
}

/// Discards every event. Useful where nobody needs to hear about orders.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopNotifier;

#[async_trait]
impl Notifier for NoopNotifier {
  async fn order_confirmed(&self, _order: &Order) -> anyhow::Result<()> {
    Ok(())
  }

  async fn admin_new_order(&self, _order: &Order) -> anyhow::Result<()> {
    Ok(())
  }

  async fn status_changed(&self, _order: &Order, _new_status: OrderStatus) -> anyhow::Result<()> {
    Ok(())
  }
}
