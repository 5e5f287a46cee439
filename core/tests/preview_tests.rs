// tests/preview_tests.rs
mod common;
use common::*;
use rust_decimal_macros::dec;
use stockline::{NewProduct, OrderError};

#[tokio::test]
async fn preview_prices_lines_and_reports_stock() {
  let shop = Shop::new();
  let mouse = shop.variant("Ergonomic Mouse", dec!(450.00), 10).await;
  let hub = shop.variant("USB-C Hub", dec!(600.00), 1).await;

  let preview = shop.engine.preview_cart(&lines(&[(mouse, 2), (hub, 2)])).await.unwrap();

  assert_eq!(preview.subtotal, dec!(2100.00));
  assert_eq!(preview.shipping_cost, dec!(0));
  assert_eq!(preview.final_amount, dec!(2100.00));
  assert_eq!(preview.shipping_message, "Free shipping!");

  assert_eq!(preview.lines.len(), 2);
  assert_eq!(preview.lines[0].line_total, dec!(900.00));
  assert!(preview.lines[0].has_stock);
  assert_eq!(preview.lines[0].stock_message, "In stock");
  assert!(!preview.lines[1].has_stock);
  assert_eq!(preview.lines[1].stock_message, "Insufficient stock");
  assert!(!preview.all_in_stock());
}

#[tokio::test]
async fn preview_below_threshold_charges_shipping() {
  let shop = Shop::new();
  let bag = shop.variant("Laptop Bag", dec!(350.00), 5).await;

  let preview = shop.engine.preview_cart(&lines(&[(bag, 1)])).await.unwrap();

  assert_eq!(preview.shipping_cost, dec!(50.00));
  assert_eq!(preview.final_amount, dec!(400.00));
  assert_eq!(preview.shipping_message, "Free shipping on orders over 1000.00.");
}

#[tokio::test]
async fn preview_never_mutates_stock() {
  let shop = Shop::new();
  let ssd = shop.variant("External SSD", dec!(2200.00), 3).await;

  for _ in 0..3 {
    shop.engine.preview_cart(&lines(&[(ssd, 2)])).await.unwrap();
  }

  assert_eq!(shop.stock(ssd).await, 3);
  assert_eq!(shop.store.order_count().await, 0);
}

#[tokio::test]
async fn unknown_variant_fails_whole_preview() {
  let shop = Shop::new();
  let mouse = shop.variant("Ergonomic Mouse", dec!(450.00), 10).await;

  let err = shop.engine.preview_cart(&lines(&[(mouse, 1), (9999, 1)])).await.unwrap_err();

  assert!(matches!(err, OrderError::VariantNotFound { variant_id: 9999 }));
}

#[tokio::test]
async fn untracked_products_always_have_stock() {
  let shop = Shop::new();
  let ebook = shop.add(NewProduct::new("Rust E-Book", dec!(30.00)).untracked(), 0).await;

  let preview = shop.engine.preview_cart(&lines(&[(ebook, 500)])).await.unwrap();

  assert!(preview.lines[0].has_stock);
}

#[tokio::test]
async fn preview_uses_live_shipping_settings() {
  let shop = Shop::new();
  let bag = shop.variant("Laptop Bag", dec!(350.00), 5).await;

  shop
    .shipping
    .replace(stockline::ShippingPolicy::new(dec!(20.00), dec!(300.00)).unwrap());
  let preview = shop.engine.preview_cart(&lines(&[(bag, 1)])).await.unwrap();

  assert_eq!(preview.shipping_cost, dec!(0));
}

#[tokio::test]
async fn empty_cart_and_zero_quantity_are_rejected() {
  let shop = Shop::new();
  let bag = shop.variant("Laptop Bag", dec!(350.00), 5).await;

  assert!(matches!(
    shop.engine.preview_cart(&[]).await,
    Err(OrderError::Validation(_))
  ));
  assert!(matches!(
    shop.engine.preview_cart(&lines(&[(bag, 0)])).await,
    Err(OrderError::Validation(_))
  ));
}
