// storefront/src/db/pg_store.rs

//! Postgres-backed [`OrderStore`]. One engine transaction is one sqlx transaction;
//! stock moves are relative updates guarded by `stock_quantity + delta >= 0`, so
//! concurrent orders serialize on the variant row instead of overwriting each other.

use async_trait::async_trait;
use sqlx::postgres::{PgConnection, PgPoolOptions};
use sqlx::{PgPool, Postgres, Transaction};
use tracing::{debug, instrument, warn};

use stockline::store::{OrderFilter, OrderLookup, Page};
use stockline::{
  CatalogReader, CustomerId, NewOrder, NewOrderItem, Order, OrderError, OrderId, OrderItem, OrderResult, OrderStatus,
  OrderStore, OrderTransaction, OrderWithItems, VariantId, VariantView,
};

use crate::config::AppConfig;
use crate::errors::Result as AppResult;
use crate::models::product::VARIANT_VIEW_SQL;
use crate::models::{OrderItemRow, OrderRow, VariantViewRow};

macro_rules! order_columns {
  () => {
    "id, customer_id, order_number, contact_email, shipping_name, shipping_phone, shipping_address, \
     shipping_city, subtotal, shipping_cost, final_amount, payment_method, status, cancel_reason, \
     created_at, updated_at"
  };
}

macro_rules! item_columns {
  () => {
    "id, order_id, product_id, variant_id, quantity, unit_price"
  };
}

fn storage(err: sqlx::Error) -> OrderError {
  OrderError::Storage { source: err.into() }
}

#[derive(Debug, Clone)]
pub struct PgOrderStore {
  pool: PgPool,
}

impl PgOrderStore {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }

  pub async fn connect(config: &AppConfig) -> AppResult<Self> {
    let pool = PgPoolOptions::new()
      .max_connections(config.database_max_connections)
      .connect(&config.database_url)
      .await?;
    Ok(Self::new(pool))
  }

  pub async fn migrate(&self) -> AppResult<()> {
    sqlx::migrate!("./migrations")
      .run(&self.pool)
      .await
      .map_err(|e| anyhow::Error::new(e).context("running migrations"))?;
    Ok(())
  }

  pub fn pool(&self) -> &PgPool {
    &self.pool
  }
}

async fn variant_view(conn: &mut PgConnection, variant_id: VariantId) -> OrderResult<Option<VariantView>> {
  let row = sqlx::query_as::<_, VariantViewRow>(VARIANT_VIEW_SQL)
    .bind(variant_id)
    .fetch_optional(conn)
    .await
    .map_err(storage)?;
  Ok(row.map(VariantView::from))
}

async fn order_items(conn: &mut PgConnection, order_id: OrderId) -> OrderResult<Vec<OrderItem>> {
  let rows = sqlx::query_as::<_, OrderItemRow>(concat!(
    "SELECT ",
    item_columns!(),
    " FROM order_items WHERE order_id = $1 ORDER BY id"
  ))
  .bind(order_id)
  .fetch_all(conn)
  .await
  .map_err(storage)?;
  Ok(rows.into_iter().map(OrderItem::from).collect())
}

async fn with_items(conn: &mut PgConnection, row: Option<OrderRow>) -> OrderResult<Option<OrderWithItems>> {
  let Some(row) = row else {
    return Ok(None);
  };
  let order = Order::try_from(row)?;
  let items = order_items(conn, order.id).await?;
  Ok(Some(OrderWithItems { order, items }))
}

fn into_orders(rows: Vec<OrderRow>) -> OrderResult<Vec<Order>> {
  rows.into_iter().map(Order::try_from).collect()
}

#[async_trait]
impl OrderStore for PgOrderStore {
  async fn begin(&self) -> OrderResult<Box<dyn OrderTransaction>> {
    let tx = self.pool.begin().await.map_err(storage)?;
    Ok(Box::new(PgTransaction { tx: Some(tx) }))
  }

  async fn catalog(&self) -> OrderResult<Box<dyn CatalogReader>> {
    Ok(Box::new(PgCatalog {
      pool: self.pool.clone(),
    }))
  }

  #[instrument(name = "PgOrderStore::find_order", skip(self), err(Display))]
  async fn find_order(&self, lookup: OrderLookup) -> OrderResult<Option<OrderWithItems>> {
    let mut conn = self.pool.acquire().await.map_err(storage)?;
    let query = match lookup {
      OrderLookup::Id(order_id) => {
        sqlx::query_as::<_, OrderRow>(concat!("SELECT ", order_columns!(), " FROM orders WHERE id = $1"))
          .bind(order_id)
      }
      OrderLookup::OwnedBy { order_id, owner } => sqlx::query_as::<_, OrderRow>(concat!(
        "SELECT ",
        order_columns!(),
        " FROM orders WHERE id = $1 AND customer_id = $2"
      ))
      .bind(order_id)
      .bind(owner),
      OrderLookup::Token(token) => sqlx::query_as::<_, OrderRow>(concat!(
        "SELECT ",
        order_columns!(),
        " FROM orders WHERE order_number = $1"
      ))
      .bind(token),
    };
    let row = query.fetch_optional(&mut *conn).await.map_err(storage)?;
    with_items(&mut *conn, row).await
  }

  async fn list_orders_for_owner(&self, owner: CustomerId) -> OrderResult<Vec<Order>> {
    let rows = sqlx::query_as::<_, OrderRow>(concat!(
      "SELECT ",
      order_columns!(),
      " FROM orders WHERE customer_id = $1 ORDER BY created_at DESC, id DESC"
    ))
    .bind(owner)
    .fetch_all(&self.pool)
    .await
    .map_err(storage)?;
    into_orders(rows)
  }

  async fn list_orders(&self, filter: &OrderFilter) -> OrderResult<Page<Order>> {
    let status = filter.status.map(|s| s.as_str());

    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders WHERE ($1::text IS NULL OR status = $1)")
      .bind(status)
      .fetch_one(&self.pool)
      .await
      .map_err(storage)?;

    let offset = i64::try_from(filter.offset()).map_err(|_| OrderError::Validation("Page is out of range.".into()))?;
    let rows = sqlx::query_as::<_, OrderRow>(concat!(
      "SELECT ",
      order_columns!(),
      " FROM orders WHERE ($1::text IS NULL OR status = $1) ORDER BY created_at DESC, id DESC LIMIT $2 OFFSET $3"
    ))
    .bind(status)
    .bind(i64::from(filter.limit))
    .bind(offset)
    .fetch_all(&self.pool)
    .await
    .map_err(storage)?;

    Ok(Page::new(into_orders(rows)?, total.max(0) as u64, filter))
  }
}

/// Read-only catalog session for previews; each read takes a pooled connection.
struct PgCatalog {
  pool: PgPool,
}

#[async_trait]
impl CatalogReader for PgCatalog {
  async fn variant_with_product(&mut self, variant_id: VariantId) -> OrderResult<Option<VariantView>> {
    let mut conn = self.pool.acquire().await.map_err(storage)?;
    variant_view(&mut *conn, variant_id).await
  }
}

/// `None` once committed or rolled back. Dropping a live sqlx transaction rolls it back.
struct PgTransaction {
  tx: Option<Transaction<'static, Postgres>>,
}

impl PgTransaction {
  fn conn(&mut self) -> OrderResult<&mut PgConnection> {
    self
      .tx
      .as_deref_mut()
      .ok_or_else(|| OrderError::storage("transaction already finished"))
  }
}

#[async_trait]
impl CatalogReader for PgTransaction {
  async fn variant_with_product(&mut self, variant_id: VariantId) -> OrderResult<Option<VariantView>> {
    variant_view(self.conn()?, variant_id).await
  }
}

#[async_trait]
impl OrderTransaction for PgTransaction {
  async fn adjust_stock(&mut self, variant_id: VariantId, delta: i32) -> OrderResult<Option<i32>> {
    let remaining: Option<i32> = sqlx::query_scalar(
      "UPDATE product_variants SET stock_quantity = stock_quantity + $2, updated_at = now() \
       WHERE id = $1 AND stock_quantity + $2 >= 0 RETURNING stock_quantity",
    )
    .bind(variant_id)
    .bind(delta)
    .fetch_optional(self.conn()?)
    .await
    .map_err(storage)?;
    if remaining.is_none() {
      warn!(variant_id, delta, "Relative stock update matched no row.");
    }
    Ok(remaining)
  }

  async fn insert_order(&mut self, order: NewOrder) -> OrderResult<Order> {
    let row = sqlx::query_as::<_, OrderRow>(concat!(
      "INSERT INTO orders (customer_id, order_number, contact_email, shipping_name, shipping_phone, \
       shipping_address, shipping_city, subtotal, shipping_cost, final_amount, payment_method, status) \
       VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, 'pending') RETURNING ",
      order_columns!()
    ))
    .bind(order.customer_id)
    .bind(order.order_number)
    .bind(&order.contact_email)
    .bind(&order.shipping.full_name)
    .bind(&order.shipping.phone)
    .bind(&order.shipping.address)
    .bind(&order.shipping.city)
    .bind(order.totals.subtotal)
    .bind(order.totals.shipping_cost)
    .bind(order.totals.final_amount)
    .bind(order.payment_method.as_str())
    .fetch_one(self.conn()?)
    .await
    .map_err(storage)?;
    let order = Order::try_from(row)?;
    debug!(order_id = order.id, "Order row inserted.");
    Ok(order)
  }

  async fn insert_items(&mut self, order_id: OrderId, items: &[NewOrderItem]) -> OrderResult<Vec<OrderItem>> {
    let mut inserted = Vec::with_capacity(items.len());
    for item in items {
      let row = sqlx::query_as::<_, OrderItemRow>(concat!(
        "INSERT INTO order_items (order_id, product_id, variant_id, quantity, unit_price) \
         VALUES ($1, $2, $3, $4, $5) RETURNING ",
        item_columns!()
      ))
      .bind(order_id)
      .bind(item.product_id)
      .bind(item.variant_id)
      .bind(item.quantity)
      .bind(item.unit_price)
      .fetch_one(self.conn()?)
      .await
      .map_err(storage)?;
      inserted.push(OrderItem::from(row));
    }
    Ok(inserted)
  }

  async fn lock_order(&mut self, order_id: OrderId, owner: Option<CustomerId>) -> OrderResult<Option<OrderWithItems>> {
    let conn = self.conn()?;
    let row = sqlx::query_as::<_, OrderRow>(concat!(
      "SELECT ",
      order_columns!(),
      " FROM orders WHERE id = $1 AND ($2::bigint IS NULL OR customer_id = $2) FOR UPDATE"
    ))
    .bind(order_id)
    .bind(owner)
    .fetch_optional(&mut *conn)
    .await
    .map_err(storage)?;
    with_items(conn, row).await
  }

  async fn set_status(
    &mut self,
    order_id: OrderId,
    status: OrderStatus,
    cancel_reason: Option<&str>,
  ) -> OrderResult<Order> {
    let row = sqlx::query_as::<_, OrderRow>(concat!(
      "UPDATE orders SET status = $2, cancel_reason = COALESCE($3, cancel_reason), updated_at = now() \
       WHERE id = $1 RETURNING ",
      order_columns!()
    ))
    .bind(order_id)
    .bind(status.as_str())
    .bind(cancel_reason)
    .fetch_optional(self.conn()?)
    .await
    .map_err(storage)?
    .ok_or(OrderError::OrderNotFound)?;
    Order::try_from(row)
  }

  async fn commit(&mut self) -> OrderResult<()> {
    let tx = self
      .tx
      .take()
      .ok_or_else(|| OrderError::storage("transaction already finished"))?;
    tx.commit().await.map_err(storage)
  }

  async fn rollback(&mut self) -> OrderResult<()> {
    match self.tx.take() {
      Some(tx) => tx.rollback().await.map_err(storage),
      None => Ok(()),
    }
  }
}
