// stockline/src/store/mod.rs

//! Storage contracts. The engine is the only writer of orders, order items and variant
//! stock, and it only writes through an [`OrderTransaction`].

pub mod memory;

use async_trait::async_trait;
use serde::Serialize;
use uuid::Uuid;

use crate::catalog::CatalogReader;
use crate::error::{OrderError, OrderResult};
use crate::model::{CustomerId, NewOrder, NewOrderItem, Order, OrderId, OrderItem, OrderStatus, OrderWithItems, VariantId};

pub const DEFAULT_PAGE_LIMIT: u32 = 10;
pub const MAX_PAGE_LIMIT: u32 = 100;

#[async_trait]
pub trait OrderStore: Send + Sync {
  /// Opens one atomic unit of work. Dropping it without `commit` discards every change.
  async fn begin(&self) -> OrderResult<Box<dyn OrderTransaction>>;

  /// Read-only catalog session for previews.
  async fn catalog(&self) -> OrderResult<Box<dyn CatalogReader>>;

  async fn find_order(&self, lookup: OrderLookup) -> OrderResult<Option<OrderWithItems>>;

  /// Newest first.
  async fn list_orders_for_owner(&self, owner: CustomerId) -> OrderResult<Vec<Order>>;

  /// Newest first, optionally filtered by status.
  async fn list_orders(&self, filter: &OrderFilter) -> OrderResult<Page<Order>>;
}

#[async_trait]
pub trait OrderTransaction: CatalogReader {
  /// Atomically adds `delta` to the variant's stock. Returns the new quantity, or
  /// `None` (leaving the row untouched) when the result would be negative.
  async fn adjust_stock(&mut self, variant_id: VariantId, delta: i32) -> OrderResult<Option<i32>>;

  /// Persists an order row with status `pending`.
  async fn insert_order(&mut self, order: NewOrder) -> OrderResult<Order>;

  async fn insert_items(&mut self, order_id: OrderId, items: &[NewOrderItem]) -> OrderResult<Vec<OrderItem>>;

  /// Loads an order and its items for mutation, optionally scoped to an owner.
  async fn lock_order(&mut self, order_id: OrderId, owner: Option<CustomerId>) -> OrderResult<Option<OrderWithItems>>;

  /// Sets the status; a `Some` reason replaces the cancel reason, `None` keeps it.
  async fn set_status(
    &mut self,
    order_id: OrderId,
    status: OrderStatus,
    cancel_reason: Option<&str>,
  ) -> OrderResult<Order>;

  async fn commit(&mut self) -> OrderResult<()>;

  async fn rollback(&mut self) -> OrderResult<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderLookup {
  Id(OrderId),
  OwnedBy { order_id: OrderId, owner: CustomerId },
  Token(Uuid),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderFilter {
  pub status: Option<OrderStatus>,
  pub page: u32,
  pub limit: u32,
}

impl OrderFilter {
  pub fn new(page: Option<u32>, limit: Option<u32>, status: Option<OrderStatus>) -> OrderResult<Self> {
    let page = page.unwrap_or(1);
    let limit = limit.unwrap_or(DEFAULT_PAGE_LIMIT);
    if page == 0 {
      return Err(OrderError::Validation("Page numbers start at 1.".to_string()));
    }
    if limit == 0 || limit > MAX_PAGE_LIMIT {
      return Err(OrderError::Validation(format!(
        "Page limit must be between 1 and {}.",
        MAX_PAGE_LIMIT
      )));
    }
    Ok(Self { status, page, limit })
  }

  pub fn offset(&self) -> u64 {
    u64::from(self.page - 1) * u64::from(self.limit)
  }
}

impl Default for OrderFilter {
  fn default() -> Self {
    Self {
      status: None,
      page: 1,
      limit: DEFAULT_PAGE_LIMIT,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
  pub total_items: u64,
  pub total_pages: u64,
  pub current_page: u32,
  pub data: Vec<T>,
}

impl<T> Page<T> {
  pub fn new(data: Vec<T>, total_items: u64, filter: &OrderFilter) -> Self {
    Self {
      total_items,
      total_pages: total_items.div_ceil(u64::from(filter.limit)),
      current_page: filter.page,
      data,
    }
  }
}
