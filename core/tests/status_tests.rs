// tests/status_tests.rs
mod common;
use common::*;
use rust_decimal_macros::dec;
use std::sync::Arc;
use stockline::status::{customer_can_cancel, CANCEL_BLOCKING};
use stockline::{OrderError, OrderStatus, StoreFault, TransitionTable};

#[test]
fn statuses_parse_from_lowercase_names_only() {
  for status in OrderStatus::ALL {
    assert_eq!(status.as_str().parse::<OrderStatus>().unwrap(), status);
  }
  assert!(matches!("Shipped".parse::<OrderStatus>(), Err(OrderError::InvalidStatus(_))));
  assert!(matches!("lost".parse::<OrderStatus>(), Err(OrderError::InvalidStatus(_))));
}

#[test]
fn only_late_statuses_block_cancellation() {
  for status in OrderStatus::ALL {
    assert_eq!(customer_can_cancel(status), !CANCEL_BLOCKING.contains(&status));
  }
  assert!(customer_can_cancel(OrderStatus::Pending));
  assert!(customer_can_cancel(OrderStatus::Returned));
}

#[test]
fn strict_table_allows_only_listed_moves() {
  let table = TransitionTable::empty()
    .allow(OrderStatus::Pending, &[OrderStatus::Preparing, OrderStatus::Cancelled])
    .allow(OrderStatus::Preparing, &[OrderStatus::Shipped]);

  assert!(table.is_allowed(OrderStatus::Pending, OrderStatus::Preparing));
  assert!(!table.is_allowed(OrderStatus::Pending, OrderStatus::Delivered));
  assert!(!table.is_allowed(OrderStatus::Shipped, OrderStatus::Pending));
  assert!(TransitionTable::permissive().is_allowed(OrderStatus::Delivered, OrderStatus::Pending));
}

#[tokio::test]
async fn permissive_updates_allow_administrative_correction() {
  let shop = Shop::new();
  let mouse = shop.variant("Ergonomic Mouse", dec!(450.00), 5).await;
  let placed = shop.engine.create_order(guest_request(&[(mouse, 1)]), None).await.unwrap();

  let shipped = shop.engine.update_status(placed.order.id, "shipped").await.unwrap();
  assert_eq!(shipped.status, OrderStatus::Shipped);

  let back = shop.engine.update_status(placed.order.id, "pending").await.unwrap();
  assert_eq!(back.status, OrderStatus::Pending);
}

#[tokio::test]
async fn admin_cancellation_does_not_restock() {
  let shop = Shop::new();
  let mouse = shop.variant("Ergonomic Mouse", dec!(450.00), 5).await;
  let placed = shop.engine.create_order(guest_request(&[(mouse, 2)]), None).await.unwrap();

  let order = shop.engine.update_status(placed.order.id, "cancelled").await.unwrap();

  assert_eq!(order.status, OrderStatus::Cancelled);
  assert_eq!(order.cancel_reason, None);
  assert_eq!(shop.stock(mouse).await, 3);
}

#[tokio::test]
async fn unknown_status_is_rejected_before_lookup() {
  let shop = Shop::new();

  let err = shop.engine.update_status(4242, "teleported").await.unwrap_err();

  assert!(matches!(err, OrderError::InvalidStatus(ref raw) if raw == "teleported"));
}

#[tokio::test]
async fn missing_order_is_not_found() {
  let shop = Shop::new();

  let err = shop.engine.update_status(4242, "shipped").await.unwrap_err();

  assert!(matches!(err, OrderError::OrderNotFound));
}

#[tokio::test]
async fn strict_table_rejects_disallowed_moves() {
  let shop = Shop::new();
  let engine = shop
    .engine
    .clone()
    .with_transitions(TransitionTable::empty().allow(OrderStatus::Pending, &[OrderStatus::Preparing]));
  let mouse = shop.variant("Ergonomic Mouse", dec!(450.00), 5).await;
  let placed = engine.create_order(guest_request(&[(mouse, 1)]), None).await.unwrap();

  let err = engine.update_status(placed.order.id, "delivered").await.unwrap_err();
  assert!(matches!(
    err,
    OrderError::TransitionNotAllowed {
      from: OrderStatus::Pending,
      to: OrderStatus::Delivered
    }
  ));

  let order = engine.update_status(placed.order.id, "preparing").await.unwrap();
  assert_eq!(order.status, OrderStatus::Preparing);
}

#[tokio::test]
async fn failed_status_write_leaves_order_untouched() {
  let shop = Shop::new();
  let mouse = shop.variant("Ergonomic Mouse", dec!(450.00), 5).await;
  let placed = shop.engine.create_order(guest_request(&[(mouse, 1)]), None).await.unwrap();

  shop.store.inject_fault(StoreFault::Commit);
  shop.engine.update_status(placed.order.id, "shipped").await.unwrap_err();

  let order = shop.engine.get_order_admin(placed.order.id).await.unwrap().order;
  assert_eq!(order.status, OrderStatus::Pending);
}

#[tokio::test]
async fn status_change_notifies_with_new_status() {
  let notifier = Arc::new(RecordingNotifier::default());
  let (shop, engine) = Shop::with_notifier(notifier.clone());
  let mouse = shop.variant("Ergonomic Mouse", dec!(450.00), 5).await;
  let placed = engine.create_order(guest_request(&[(mouse, 1)]), None).await.unwrap();

  engine.update_status(placed.order.id, "shipped").await.unwrap();
  let sent = notifier.wait_for(3).await;

  assert!(sent.contains(&Sent::StatusChanged {
    order_id: placed.order.id,
    status: OrderStatus::Shipped,
  }));
}
