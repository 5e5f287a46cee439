// stockline/src/preview.rs

use rust_decimal::Decimal;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, instrument};

use crate::catalog::lookup_variant;
use crate::error::OrderResult;
use crate::model::order::validate_cart_lines;
use crate::model::{CartLine, VariantId};
use crate::pricing::{subtotal, PricedLine, ShippingPolicy, ShippingSettings};
use crate::store::OrderStore;

pub const IN_STOCK_MESSAGE: &str = "In stock";
pub const INSUFFICIENT_STOCK_MESSAGE: &str = "Insufficient stock";
pub const FREE_SHIPPING_MESSAGE: &str = "Free shipping!";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewLine {
  pub variant_id: VariantId,
  pub product_name: String,
  pub variant_name: String,
  pub unit_price: Decimal,
  pub quantity: i32,
  pub line_total: Decimal,
  pub has_stock: bool,
  pub stock_message: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartPreview {
  pub subtotal: Decimal,
  pub shipping_cost: Decimal,
  pub final_amount: Decimal,
  pub shipping_message: String,
  #[serde(rename = "items")]
  pub lines: Vec<PreviewLine>,
}

impl CartPreview {
  /// True when every line could be fulfilled right now.
  pub fn all_in_stock(&self) -> bool {
    self.lines.iter().all(|line| line.has_stock)
  }
}

/// Side-effect-free dry run of an order: prices the cart and reports availability.
/// Stock shortfalls are flagged per line, never raised.
#[derive(Clone)]
pub struct CartPreviewService {
  store: Arc<dyn OrderStore>,
  shipping: ShippingSettings,
}

impl CartPreviewService {
  pub fn new(store: Arc<dyn OrderStore>, shipping: ShippingSettings) -> Self {
    Self { store, shipping }
  }

  #[instrument(name = "CartPreviewService::preview", skip_all, fields(lines = lines.len()), err(Display))]
  pub async fn preview(&self, lines: &[CartLine]) -> OrderResult<CartPreview> {
    validate_cart_lines(lines)?;

    let mut catalog = self.store.catalog().await?;
    let mut priced = Vec::with_capacity(lines.len());
    let mut preview_lines = Vec::with_capacity(lines.len());

    for line in lines {
      // Any unknown variant fails the whole preview.
      let view = lookup_variant(catalog.as_mut(), line.variant_id).await?;
      let has_stock = view.has_stock_for(line.quantity);
      let priced_line = PricedLine::new(view.price, line.quantity);

      preview_lines.push(PreviewLine {
        variant_id: view.variant_id,
        product_name: view.product_name,
        variant_name: view.variant_name,
        unit_price: view.price,
        quantity: line.quantity,
        line_total: priced_line.line_total(),
        has_stock,
        stock_message: if has_stock { IN_STOCK_MESSAGE } else { INSUFFICIENT_STOCK_MESSAGE },
      });
      priced.push(priced_line);
    }

    let policy = self.shipping.current();
    let totals = policy.quote(subtotal(&priced));
    debug!(subtotal = %totals.subtotal, shipping = %totals.shipping_cost, "Cart priced.");

    Ok(CartPreview {
      subtotal: totals.subtotal,
      shipping_cost: totals.shipping_cost,
      final_amount: totals.final_amount,
      shipping_message: shipping_message(&policy, totals.shipping_cost),
      lines: preview_lines,
    })
  }
}

pub fn shipping_message(policy: &ShippingPolicy, shipping_cost: Decimal) -> String {
  if shipping_cost.is_zero() {
    FREE_SHIPPING_MESSAGE.to_string()
  } else {
    format!("Free shipping on orders over {}.", policy.free_threshold)
  }
}
