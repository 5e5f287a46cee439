// storefront/tests/common/mod.rs
#![allow(dead_code)] // Allow unused code in this common test module

use async_trait::async_trait;
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tracing::Level;

use stockline::{MemoryStore, NewProduct, NewVariant, NoopNotifier, OrderEngine, ShippingPolicy, ShippingSettings, VariantId};
use storefront::config::AppConfig;
use storefront::services::{MailTransport, OutgoingMail, SentEmailInfo};
use storefront::state::AppState;

// --- Tracing Setup (once per test binary) ---
static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer()
    .try_init()
    .ok();
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}

/// Builds the full route table over `$state` and returns the initialized test service.
macro_rules! test_app {
  ($state:expr) => {
    actix_web::test::init_service(
      actix_web::App::new()
        .app_data(actix_web::web::Data::new($state))
        .configure(storefront::web::configure_app_routes),
    )
    .await
  };
}

pub fn test_config() -> AppConfig {
  AppConfig::from_lookup(|name| match name {
    "DATABASE_URL" => Some("postgres://localhost/storefront_test".to_string()),
    "FRONTEND_URL" => Some("https://shop.example.com/".to_string()),
    "ADMIN_EMAIL" => Some("ops@example.com".to_string()),
    "MAIL_FROM" => Some("orders@example.com".to_string()),
    _ => None,
  })
  .expect("test config")
}

pub struct TestShop {
  pub store: Arc<MemoryStore>,
  pub state: AppState,
}

impl TestShop {
  pub fn new() -> Self {
    setup_tracing();
    let store = Arc::new(MemoryStore::new());
    let shipping = ShippingSettings::new(ShippingPolicy::new(dec!(50.00), dec!(1000.00)).expect("policy"));
    let engine = OrderEngine::new(store.clone(), shipping, Arc::new(NoopNotifier));
    let state = AppState::new(engine, Arc::new(test_config()));
    TestShop { store, state }
  }

  pub async fn variant(&self, name: &str, price: Decimal, stock: i32) -> VariantId {
    let product = self.store.insert_product(NewProduct::new(name, price)).await.expect("product");
    self
      .store
      .insert_variant(NewVariant::new(product.id, "Standard", stock))
      .await
      .expect("variant")
      .id
  }

  pub async fn stock(&self, variant_id: VariantId) -> i32 {
    self.store.stock_of(variant_id).await.expect("variant exists")
  }
}

pub fn order_body(lines: &[(VariantId, i32)]) -> Value {
  json!({
    "items": lines
      .iter()
      .map(|(variant_id, quantity)| json!({ "variantId": variant_id, "quantity": quantity }))
      .collect::<Vec<_>>(),
    "shippingInfo": {
      "fullName": "Ada Lovelace",
      "phone": "+44 20 7946 0000",
      "address": "12 Analytical Row",
      "city": "London"
    },
    "paymentMethod": "cod",
    "contactEmail": "guest@example.com"
  })
}

pub fn amount(value: &Value) -> Decimal {
  match value {
    Value::String(s) => s.parse().expect("decimal string"),
    other => other.to_string().parse().expect("decimal number"),
  }
}

// --- Mail ---

/// Captures mail instead of sending it.
#[derive(Debug, Default)]
pub struct RecordingTransport {
  pub sent: Mutex<Vec<OutgoingMail>>,
}

impl RecordingTransport {
  pub async fn wait_for(&self, count: usize) -> Vec<OutgoingMail> {
    for _ in 0..200 {
      if self.sent.lock().len() >= count {
        break;
      }
      tokio::time::sleep(Duration::from_millis(5)).await;
    }
    self.sent.lock().clone()
  }
}

#[async_trait]
impl MailTransport for RecordingTransport {
  async fn send(&self, mail: OutgoingMail) -> anyhow::Result<SentEmailInfo> {
    let info = SentEmailInfo {
      to: mail.to.clone(),
      subject: mail.subject.clone(),
      body_preview: mail.html_body.chars().take(50).collect(),
      message_id: format!("recorded_{}", self.sent.lock().len()),
    };
    self.sent.lock().push(mail);
    Ok(info)
  }
}
