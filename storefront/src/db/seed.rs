// storefront/src/db/seed.rs

use rust_decimal::Decimal;
use tracing::info;

use crate::errors::Result as AppResult;
use crate::models::{ProductRow, VariantRow};
use sqlx::PgPool;

struct DemoProduct {
  name: &'static str,
  description: &'static str,
  price: Decimal,
  has_stock_tracking: bool,
  variants: &'static [(&'static str, &'static str, i32)], // (name, sku, stock)
}

fn demo_catalog() -> Vec<DemoProduct> {
  vec![
    DemoProduct {
      name: "Mechanical Keyboard",
      description: "Hot-swappable 75% keyboard.",
      price: Decimal::new(75000, 2),
      has_stock_tracking: true,
      variants: &[("Brown Switches", "KB-75-BRN", 12), ("Red Switches", "KB-75-RED", 8)],
    },
    DemoProduct {
      name: "Ergonomic Mouse",
      description: "Vertical wireless mouse.",
      price: Decimal::new(45000, 2),
      has_stock_tracking: true,
      variants: &[("Black", "MS-ERG-BLK", 25), ("White", "MS-ERG-WHT", 3)],
    },
    DemoProduct {
      name: "USB-C Hub",
      description: "7-in-1 aluminium hub.",
      price: Decimal::new(60000, 2),
      has_stock_tracking: true,
      variants: &[("Space Grey", "HUB-7-GRY", 1)],
    },
    DemoProduct {
      name: "Keyboard Care E-Book",
      description: "Downloadable cleaning and modding guide.",
      price: Decimal::new(2500, 2),
      has_stock_tracking: false,
      variants: &[("PDF", "EBOOK-KB-PDF", 0)],
    },
  ]
}

/// Inserts the demo catalog when `products` is empty. Returns how many variants were created.
pub async fn seed_demo_catalog(pool: &PgPool) -> AppResult<usize> {
  let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products").fetch_one(pool).await?;
  if existing > 0 {
    info!(existing, "Catalog already populated; skipping demo seed.");
    return Ok(0);
  }

  let mut tx = pool.begin().await?;
  let mut created = 0;
  for demo in demo_catalog() {
    let product: ProductRow = sqlx::query_as(
      "INSERT INTO products (name, description, price, has_stock_tracking) VALUES ($1, $2, $3, $4) \
       RETURNING id, name, description, price, is_active, has_stock_tracking, created_at, updated_at",
    )
    .bind(demo.name)
    .bind(demo.description)
    .bind(demo.price)
    .bind(demo.has_stock_tracking)
    .fetch_one(&mut *tx)
    .await?;

    for (name, sku, stock) in demo.variants {
      let variant: VariantRow = sqlx::query_as(
        "INSERT INTO product_variants (product_id, name, sku, stock_quantity) VALUES ($1, $2, $3, $4) \
         RETURNING id, product_id, name, stock_quantity, sku, created_at, updated_at",
      )
      .bind(product.id)
      .bind(*name)
      .bind(*sku)
      .bind(*stock)
      .fetch_one(&mut *tx)
      .await?;
      info!(product = %product.name, variant_id = variant.id, sku = ?variant.sku, stock = variant.stock_quantity, "Seeded variant.");
      created += 1;
    }
  }
  tx.commit().await?;

  info!(created, "Demo catalog seeded.");
  Ok(created)
}
