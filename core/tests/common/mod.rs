// tests/common/mod.rs
#![allow(dead_code)] // Allow unused code in this common test module

use async_trait::async_trait;
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::Arc;
use std::time::Duration;
use stockline::{
  CartLine, Customer, MemoryStore, NewProduct, NewVariant, Notifier, Order, OrderEngine, OrderRequest, OrderStatus,
  PaymentMethod, ShippingInfo, ShippingPolicy, ShippingSettings, VariantId,
};
use tracing::Level;

// --- Tracing Setup (once per test binary) ---
static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer() // Important for tests to capture output
    .try_init()
    .ok(); // Allow multiple initializations in tests (ok if fails)
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}

// --- Notifiers ---

#[derive(Debug, Clone, PartialEq)]
pub enum Sent {
  Confirmed { order_id: i64, email: String },
  AdminNewOrder { order_id: i64 },
  StatusChanged { order_id: i64, status: OrderStatus },
}

/// Records every notification it is asked to deliver.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
  sent: Mutex<Vec<Sent>>,
}

impl RecordingNotifier {
  pub fn sent(&self) -> Vec<Sent> {
    self.sent.lock().clone()
  }

  /// Polls until at least `count` notifications arrived (they are delivered on detached tasks).
  pub async fn wait_for(&self, count: usize) -> Vec<Sent> {
    for _ in 0..200 {
      if self.sent.lock().len() >= count {
        break;
      }
      tokio::time::sleep(Duration::from_millis(5)).await;
    }
    self.sent()
  }
}

#[async_trait]
impl Notifier for RecordingNotifier {
  async fn order_confirmed(&self, order: &Order) -> anyhow::Result<()> {
    self.sent.lock().push(Sent::Confirmed {
      order_id: order.id,
      email: order.contact_email.clone(),
    });
    Ok(())
  }

  async fn admin_new_order(&self, order: &Order) -> anyhow::Result<()> {
    self.sent.lock().push(Sent::AdminNewOrder { order_id: order.id });
    Ok(())
  }

  async fn status_changed(&self, order: &Order, new_status: OrderStatus) -> anyhow::Result<()> {
    self.sent.lock().push(Sent::StatusChanged {
      order_id: order.id,
      status: new_status,
    });
    Ok(())
  }
}

/// Fails every delivery after counting the attempt.
#[derive(Debug, Default)]
pub struct FailingNotifier {
  pub attempts: Mutex<usize>,
}

#[async_trait]
impl Notifier for FailingNotifier {
  async fn order_confirmed(&self, _order: &Order) -> anyhow::Result<()> {
    *self.attempts.lock() += 1;
    anyhow::bail!("smtp connection refused")
  }

  async fn admin_new_order(&self, _order: &Order) -> anyhow::Result<()> {
    *self.attempts.lock() += 1;
    anyhow::bail!("smtp connection refused")
  }

  async fn status_changed(&self, _order: &Order, _new_status: OrderStatus) -> anyhow::Result<()> {
    *self.attempts.lock() += 1;
    anyhow::bail!("smtp connection refused")
  }
}

// --- Store + Engine Fixture ---

pub struct Shop {
  pub store: Arc<MemoryStore>,
  pub engine: OrderEngine,
  pub notifier: Arc<RecordingNotifier>,
  pub shipping: ShippingSettings,
}

pub fn policy() -> ShippingPolicy {
  ShippingPolicy::new(dec!(50.00), dec!(1000.00)).expect("valid policy")
}

impl Shop {
  pub fn new() -> Self {
    setup_tracing();
    let store = Arc::new(MemoryStore::new());
    let notifier = Arc::new(RecordingNotifier::default());
    let shipping = ShippingSettings::new(policy());
    let engine = OrderEngine::new(store.clone(), shipping.clone(), notifier.clone());
    Shop {
      store,
      engine,
      notifier,
      shipping,
    }
  }

  pub fn with_notifier(notifier: Arc<dyn Notifier>) -> (Self, OrderEngine) {
    let shop = Shop::new();
    let engine = OrderEngine::new(shop.store.clone(), shop.shipping.clone(), notifier);
    (shop, engine)
  }

  /// Adds a stock-tracked, active product with one variant.
  pub async fn variant(&self, name: &str, price: Decimal, stock: i32) -> VariantId {
    self.add(NewProduct::new(name, price), stock).await
  }

  pub async fn add(&self, product: NewProduct, stock: i32) -> VariantId {
    let name = format!("{} / Standard", product.name);
    let product = self.store.insert_product(product).await.expect("product");
    self
      .store
      .insert_variant(NewVariant::new(product.id, name, stock))
      .await
      .expect("variant")
      .id
  }

  pub async fn stock(&self, variant_id: VariantId) -> i32 {
    self.store.stock_of(variant_id).await.expect("variant exists")
  }
}

pub fn shipping_info() -> ShippingInfo {
  ShippingInfo {
    full_name: "Ada Lovelace".to_string(),
    phone: "+44 20 7946 0000".to_string(),
    address: "12 Analytical Row".to_string(),
    city: "London".to_string(),
  }
}

pub fn guest_request(lines: &[(VariantId, i32)]) -> OrderRequest {
  OrderRequest {
    lines: lines.iter().map(|&(variant_id, quantity)| CartLine::new(variant_id, quantity)).collect(),
    shipping: shipping_info(),
    payment_method: PaymentMethod::CashOnDelivery,
    contact_email: Some("guest@example.com".to_string()),
  }
}

pub fn lines(lines: &[(VariantId, i32)]) -> Vec<CartLine> {
  lines.iter().map(|&(variant_id, quantity)| CartLine::new(variant_id, quantity)).collect()
}

pub fn customer(id: i64) -> Customer {
  Customer {
    id,
    email: format!("customer{}@example.com", id),
  }
}
