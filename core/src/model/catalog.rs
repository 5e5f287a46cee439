// stockline/src/model/catalog.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{ProductId, VariantId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
  pub id: ProductId,
  pub name: String,
  pub price: Decimal,
  pub is_active: bool,
  /// When false the product is unlimited (digital goods): stock is never checked or changed.
  pub has_stock_tracking: bool,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductVariant {
  pub id: VariantId,
  pub product_id: ProductId,
  pub name: String,
  pub stock_quantity: i32,
  pub sku: Option<String>,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

/// A variant joined with the parent product fields the engine cares about, as of the read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantView {
  pub variant_id: VariantId,
  pub variant_name: String,
  pub stock_quantity: i32,
  pub sku: Option<String>,
  pub product_id: ProductId,
  pub product_name: String,
  pub price: Decimal,
  pub is_active: bool,
  pub has_stock_tracking: bool,
}

impl VariantView {
  pub fn from_parts(variant: &ProductVariant, product: &Product) -> Self {
    Self {
      variant_id: variant.id,
      variant_name: variant.name.clone(),
      stock_quantity: variant.stock_quantity,
      sku: variant.sku.clone(),
      product_id: product.id,
      product_name: product.name.clone(),
      price: product.price,
      is_active: product.is_active,
      has_stock_tracking: product.has_stock_tracking,
    }
  }

  pub fn has_stock_for(&self, quantity: i32) -> bool {
    !self.has_stock_tracking || self.stock_quantity >= quantity
  }
}

/// Catalog seeding input. Catalog management proper lives outside the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
  pub name: String,
  pub price: Decimal,
  pub is_active: bool,
  pub has_stock_tracking: bool,
}

impl NewProduct {
  pub fn new(name: impl Into<String>, price: Decimal) -> Self {
    Self {
      name: name.into(),
      price,
      is_active: true,
      has_stock_tracking: true,
    }
  }

  pub fn inactive(mut self) -> Self {
    self.is_active = false;
    self
  }

  pub fn untracked(mut self) -> Self {
    self.has_stock_tracking = false;
    self
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewVariant {
  pub product_id: ProductId,
  pub name: String,
  pub stock_quantity: i32,
  pub sku: Option<String>,
}

impl NewVariant {
  pub fn new(product_id: ProductId, name: impl Into<String>, stock_quantity: i32) -> Self {
    Self {
      product_id,
      name: name.into(),
      stock_quantity,
      sku: None,
    }
  }

  pub fn with_sku(mut self, sku: impl Into<String>) -> Self {
    self.sku = Some(sku.into());
    self
  }
}
