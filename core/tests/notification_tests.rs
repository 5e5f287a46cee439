// tests/notification_tests.rs
mod common;
use common::*;
use rust_decimal_macros::dec;
use std::sync::Arc;
use std::time::Duration;
use stockline::{NoopNotifier, OrderStatus};

#[tokio::test]
async fn failing_delivery_never_reaches_the_caller() {
  let notifier = Arc::new(FailingNotifier::default());
  let (shop, engine) = Shop::with_notifier(notifier.clone());
  let mouse = shop.variant("Ergonomic Mouse", dec!(450.00), 5).await;
  let owner = customer(2);

  let placed = engine.create_order(guest_request(&[(mouse, 1)]), Some(&owner)).await.unwrap();
  let cancelled = engine.cancel_order(placed.order.id, owner.id, None).await.unwrap();

  assert_eq!(cancelled.status, OrderStatus::Cancelled);
  assert_eq!(shop.stock(mouse).await, 5);

  for _ in 0..200 {
    if *notifier.attempts.lock() >= 3 {
      break;
    }
    tokio::time::sleep(Duration::from_millis(5)).await;
  }
  assert_eq!(*notifier.attempts.lock(), 3);
}

#[tokio::test]
async fn noop_notifier_accepts_everything() {
  let (shop, engine) = Shop::with_notifier(Arc::new(NoopNotifier));
  let mouse = shop.variant("Ergonomic Mouse", dec!(450.00), 5).await;

  let placed = engine.create_order(guest_request(&[(mouse, 1)]), None).await.unwrap();
  engine.update_status(placed.order.id, "delivered").await.unwrap();

  assert!(shop.notifier.sent().is_empty());
}
