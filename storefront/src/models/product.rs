// storefront/src/models/product.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::FromRow;

use stockline::{Product, ProductVariant, VariantView};

#[derive(Debug, Clone, FromRow)]
pub struct ProductRow {
  pub id: i64,
  pub name: String,
  pub description: Option<String>, // Description can be optional
  pub price: Decimal,
  pub is_active: bool,
  pub has_stock_tracking: bool,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
  fn from(row: ProductRow) -> Self {
    Product {
      id: row.id,
      name: row.name,
      price: row.price,
      is_active: row.is_active,
      has_stock_tracking: row.has_stock_tracking,
      created_at: row.created_at,
      updated_at: row.updated_at,
    }
  }
}

#[derive(Debug, Clone, FromRow)]
pub struct VariantRow {
  pub id: i64,
  pub product_id: i64,
  pub name: String,
  pub stock_quantity: i32,
  pub sku: Option<String>,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl From<VariantRow> for ProductVariant {
  fn from(row: VariantRow) -> Self {
    ProductVariant {
      id: row.id,
      product_id: row.product_id,
      name: row.name,
      stock_quantity: row.stock_quantity,
      sku: row.sku,
      created_at: row.created_at,
      updated_at: row.updated_at,
    }
  }
}

/// Variant joined with its product, see [`VARIANT_VIEW_SQL`].
#[derive(Debug, Clone, FromRow)]
pub struct VariantViewRow {
  pub variant_id: i64,
  pub variant_name: String,
  pub stock_quantity: i32,
  pub sku: Option<String>,
  pub product_id: i64,
  pub product_name: String,
  pub price: Decimal,
  pub is_active: bool,
  pub has_stock_tracking: bool,
}

pub const VARIANT_VIEW_SQL: &str = "SELECT v.id AS variant_id, v.name AS variant_name, v.stock_quantity, v.sku, \
   p.id AS product_id, p.name AS product_name, p.price, p.is_active, p.has_stock_tracking \
   FROM product_variants v JOIN products p ON p.id = v.product_id WHERE v.id = $1";

impl From<VariantViewRow> for VariantView {
  fn from(row: VariantViewRow) -> Self {
    VariantView {
      variant_id: row.variant_id,
      variant_name: row.variant_name,
      stock_quantity: row.stock_quantity,
      sku: row.sku,
      product_id: row.product_id,
      product_name: row.product_name,
      price: row.price,
      is_active: row.is_active,
      has_stock_tracking: row.has_stock_tracking,
    }
  }
}
