// stockline/examples/checkout_walkthrough.rs

use rust_decimal_macros::dec;
use std::sync::Arc;
use stockline::{
  CartLine, Customer, MemoryStore, NewProduct, NewVariant, NoopNotifier, OrderEngine, OrderError, OrderRequest,
  PaymentMethod, ShippingInfo, ShippingPolicy, ShippingSettings,
};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), OrderError> {
  // Initialize tracing (optional, for demonstration)
  tracing_subscriber::fmt().with_max_level(tracing::Level::INFO).init();

  info!("--- Checkout Walkthrough ---");

  // 1. Seed a tiny catalog.
  let store = Arc::new(MemoryStore::new());
  let keyboard = store.insert_product(NewProduct::new("Mechanical Keyboard", dec!(750.00))).await?;
  let brown = store
    .insert_variant(NewVariant::new(keyboard.id, "Brown Switches", 4).with_sku("KB-BRN"))
    .await?;
  let ebook = store
    .insert_product(NewProduct::new("Keyboard Care E-Book", dec!(25.00)).untracked())
    .await?;
  let ebook_variant = store.insert_variant(NewVariant::new(ebook.id, "PDF", 0)).await?;

  // 2. Build the engine with live shipping settings.
  let shipping = ShippingSettings::new(ShippingPolicy::new(dec!(50.00), dec!(1000.00))?);
  let engine = OrderEngine::new(store.clone(), shipping.clone(), Arc::new(NoopNotifier));

  // 3. Preview: nothing is reserved.
  let cart = vec![CartLine::new(brown.id, 1), CartLine::new(ebook_variant.id, 1)];
  let preview = engine.preview_cart(&cart).await?;
  info!(subtotal = %preview.subtotal, shipping = %preview.shipping_cost, "{}", preview.shipping_message);

  // 4. Place the order as a signed-in customer.
  let customer = Customer {
    id: 1,
    email: "grace@example.com".to_string(),
  };
  let request = OrderRequest {
    lines: cart,
    shipping: ShippingInfo {
      full_name: "Grace Hopper".to_string(),
      phone: "+1 555 0100".to_string(),
      address: "1 Compiler Way".to_string(),
      city: "Arlington".to_string(),
    },
    payment_method: PaymentMethod::CashOnDelivery,
    contact_email: None,
  };
  let placed = engine.create_order(request, Some(&customer)).await?;
  info!(
    order_number = %placed.order.order_number,
    final_amount = %placed.order.final_amount,
    stock_left = ?store.stock_of(brown.id).await,
    "Order placed."
  );

  // 5. Anyone holding the token can track it.
  let tracked = engine.track_order(placed.order.order_number).await?;
  info!(status = %tracked.order.status, items = tracked.items.len(), "Tracked order.");

  // 6. The customer changes their mind; stock comes back.
  let cancelled = engine
    .cancel_order(placed.order.id, customer.id, Some("Ordered the wrong switches"))
    .await?;
  info!(
    status = %cancelled.status,
    reason = ?cancelled.cancel_reason,
    stock_left = ?store.stock_of(brown.id).await,
    "Order cancelled."
  );

  // 7. Cancelling again is refused.
  match engine.cancel_order(placed.order.id, customer.id, None).await {
    Err(e @ OrderError::CannotCancel { .. }) => info!("Second cancellation refused as expected: {}", e),
    other => info!("Unexpected outcome: {:?}", other),
  }

  info!("--- Checkout Walkthrough Complete ---");
  Ok(())
}
