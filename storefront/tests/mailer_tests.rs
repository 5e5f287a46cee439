// storefront/tests/mailer_tests.rs
mod common;
use common::*;

use rust_decimal_macros::dec;
use std::sync::Arc;
use stockline::{MemoryStore, NewProduct, NewVariant, OrderEngine, OrderRequest, OrderStatus, ShippingSettings};
use storefront::services::{MailNotifier, MailTransport, MockMailTransport, OutgoingMail};

async fn engine_with_mail(transport: Arc<RecordingTransport>) -> (OrderEngine, i64) {
  setup_tracing();
  let store = Arc::new(MemoryStore::new());
  let product = store.insert_product(NewProduct::new("Ergonomic Mouse", dec!(450.00))).await.unwrap();
  let variant = store.insert_variant(NewVariant::new(product.id, "Black", 5)).await.unwrap();
  let notifier = MailNotifier::new(transport, &test_config());
  let engine = OrderEngine::new(store, ShippingSettings::default(), Arc::new(notifier));
  (engine, variant.id)
}

#[tokio::test]
async fn placement_mails_customer_and_admin() {
  let transport = Arc::new(RecordingTransport::default());
  let (engine, variant) = engine_with_mail(transport.clone()).await;

  let request: OrderRequest = serde_json::from_value(order_body(&[(variant, 1)])).unwrap();
  let placed = engine.create_order(request, None).await.unwrap();
  let sent = transport.wait_for(2).await;

  let confirmation = sent.iter().find(|m| m.to == "guest@example.com").expect("confirmation");
  let link = format!(
    "https://shop.example.com/track-order?code={}",
    placed.order.order_number
  );
  assert!(confirmation.html_body.contains(&link));
  assert!(confirmation.subject.contains(&placed.order.order_number.to_string()));
  assert_eq!(confirmation.from, "orders@example.com");

  let alert = sent.iter().find(|m| m.to == "ops@example.com").expect("admin alert");
  assert!(alert.html_body.contains("guest@example.com"));
}

#[tokio::test]
async fn status_mail_uses_per_status_wording() {
  let transport = Arc::new(RecordingTransport::default());
  let (engine, variant) = engine_with_mail(transport.clone()).await;
  let request: OrderRequest = serde_json::from_value(order_body(&[(variant, 1)])).unwrap();
  let placed = engine.create_order(request, None).await.unwrap();

  engine.update_status(placed.order.id, "shipped").await.unwrap();
  let sent = transport.wait_for(3).await;

  let update = sent
    .iter()
    .find(|m| m.subject == "Order update: SHIPPED")
    .expect("status mail");
  assert!(update.html_body.contains("Your order has been shipped!"));
  assert_eq!(update.to, "guest@example.com");
}

#[test]
fn returned_status_falls_back_to_generic_wording() {
  let notifier = MailNotifier::new(Arc::new(MockMailTransport), &test_config());
  let order = stockline::Order {
    id: 1,
    customer_id: None,
    order_number: uuid::Uuid::nil(),
    contact_email: "guest@example.com".to_string(),
    shipping_name: "Ada".to_string(),
    shipping_phone: "1".to_string(),
    shipping_address: "Row 1".to_string(),
    shipping_city: "London".to_string(),
    subtotal: dec!(10.00),
    shipping_cost: dec!(50.00),
    final_amount: dec!(60.00),
    payment_method: stockline::PaymentMethod::BankTransfer,
    status: OrderStatus::Returned,
    cancel_reason: None,
    created_at: chrono::Utc::now(),
    updated_at: chrono::Utc::now(),
  };

  let mail = notifier.status_mail(&order, OrderStatus::Returned);

  assert!(mail.html_body.contains("Your order status was updated: returned"));
  assert_eq!(mail.subject, "Order update: RETURNED");
}

#[tokio::test]
async fn mock_transport_fails_on_marked_subjects() {
  let transport = MockMailTransport;
  let mail = |subject: &str| OutgoingMail {
    to: "a@example.com".to_string(),
    from: "b@example.com".to_string(),
    subject: subject.to_string(),
    html_body: "<p>hello</p>".to_string(),
  };

  let sent = transport.send(mail("Welcome")).await.unwrap();
  assert!(sent.message_id.starts_with("mock_email_"));
  assert!(transport.send(mail("FAIL_TEST please")).await.is_err());
}
