// stockline/src/store/memory.rs

//! In-process store for tests, benchmarks and demos.
//!
//! A transaction takes the store-wide async lock for its whole lifetime and works on a
//! staged copy of the state: `commit` swaps the copy in, `rollback` or drop discards it.
//! Transactions therefore serialize, which is the strongest form of the row-level
//! locking the engine relies on.

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex as SyncMutex;
use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{debug, trace};

use crate::catalog::CatalogReader;
use crate::error::{OrderError, OrderResult};
use crate::model::{
  CustomerId, NewOrder, NewOrderItem, NewProduct, NewVariant, Order, OrderId, OrderItem, OrderItemId, OrderStatus,
  OrderWithItems, Product, ProductId, ProductVariant, VariantId, VariantView,
};
use crate::status::INITIAL_STATUS;
use crate::store::{OrderFilter, OrderLookup, OrderStore, OrderTransaction, Page};

/// A one-shot failure point, used to exercise rollback paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreFault {
  AdjustStock,
  InsertOrder,
  InsertItems,
  SetStatus,
  Commit,
}

#[derive(Debug, Clone, Default)]
struct MemoryState {
  products: HashMap<ProductId, Product>,
  variants: HashMap<VariantId, ProductVariant>,
  orders: BTreeMap<OrderId, Order>,
  items: BTreeMap<OrderItemId, OrderItem>,
  last_product_id: ProductId,
  last_variant_id: VariantId,
  last_order_id: OrderId,
  last_item_id: OrderItemId,
}

impl MemoryState {
  fn view(&self, variant_id: VariantId) -> Option<VariantView> {
    let variant = self.variants.get(&variant_id)?;
    let product = self.products.get(&variant.product_id)?;
    Some(VariantView::from_parts(variant, product))
  }

  fn with_items(&self, order: &Order) -> OrderWithItems {
    let items = self
      .items
      .values()
      .filter(|item| item.order_id == order.id)
      .cloned()
      .collect();
    OrderWithItems {
      order: order.clone(),
      items,
    }
  }

  fn lookup(&self, lookup: OrderLookup) -> Option<OrderWithItems> {
    let order = match lookup {
      OrderLookup::Id(order_id) => self.orders.get(&order_id),
      OrderLookup::OwnedBy { order_id, owner } => self.orders.get(&order_id).filter(|o| o.is_owned_by(owner)),
      OrderLookup::Token(token) => self.orders.values().find(|o| o.order_number == token),
    }?;
    Some(self.with_items(order))
  }

  fn newest_first<'a>(orders: impl Iterator<Item = &'a Order>) -> Vec<Order> {
    let mut orders: Vec<Order> = orders.cloned().collect();
    orders.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
    orders
  }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
  state: Arc<Mutex<MemoryState>>,
  fault: Arc<SyncMutex<Option<StoreFault>>>,
}

impl MemoryStore {
  pub fn new() -> Self {
    Self::default()
  }

  pub async fn insert_product(&self, product: NewProduct) -> OrderResult<Product> {
    if product.price.is_sign_negative() {
      return Err(OrderError::Validation("Product price must not be negative.".to_string()));
    }
    let mut state = self.state.lock().await;
    state.last_product_id += 1;
    let now = Utc::now();
    let product = Product {
      id: state.last_product_id,
      name: product.name,
      price: product.price,
      is_active: product.is_active,
      has_stock_tracking: product.has_stock_tracking,
      created_at: now,
      updated_at: now,
    };
    state.products.insert(product.id, product.clone());
    Ok(product)
  }

  pub async fn insert_variant(&self, variant: NewVariant) -> OrderResult<ProductVariant> {
    if variant.stock_quantity < 0 {
      return Err(OrderError::Validation("Stock quantity must not be negative.".to_string()));
    }
    let mut state = self.state.lock().await;
    if !state.products.contains_key(&variant.product_id) {
      return Err(OrderError::Validation(format!("Unknown product {}.", variant.product_id)));
    }
    if let Some(sku) = &variant.sku {
      if state.variants.values().any(|v| v.sku.as_ref() == Some(sku)) {
        return Err(OrderError::Validation(format!("SKU '{}' is already in use.", sku)));
      }
    }
    state.last_variant_id += 1;
    let now = Utc::now();
    let variant = ProductVariant {
      id: state.last_variant_id,
      product_id: variant.product_id,
      name: variant.name,
      stock_quantity: variant.stock_quantity,
      sku: variant.sku,
      created_at: now,
      updated_at: now,
    };
    state.variants.insert(variant.id, variant.clone());
    Ok(variant)
  }

  /// Catalog-management stand-in: flips a product's sale flag.
  pub async fn set_product_active(&self, product_id: ProductId, is_active: bool) -> OrderResult<()> {
    let mut state = self.state.lock().await;
    let product = state
      .products
      .get_mut(&product_id)
      .ok_or_else(|| OrderError::Validation(format!("Unknown product {}.", product_id)))?;
    product.is_active = is_active;
    product.updated_at = Utc::now();
    Ok(())
  }

  /// Catalog-management stand-in: reprices a product.
  pub async fn set_product_price(&self, product_id: ProductId, price: Decimal) -> OrderResult<()> {
    let mut state = self.state.lock().await;
    let product = state
      .products
      .get_mut(&product_id)
      .ok_or_else(|| OrderError::Validation(format!("Unknown product {}.", product_id)))?;
    product.price = price;
    product.updated_at = Utc::now();
    Ok(())
  }

  pub async fn stock_of(&self, variant_id: VariantId) -> Option<i32> {
    self.state.lock().await.variants.get(&variant_id).map(|v| v.stock_quantity)
  }

  pub async fn order_count(&self) -> usize {
    self.state.lock().await.orders.len()
  }

  pub async fn item_count(&self) -> usize {
    self.state.lock().await.items.len()
  }

  /// Arms a failure that fires the next time a transaction reaches `point`.
  pub fn inject_fault(&self, point: StoreFault) {
    *self.fault.lock() = Some(point);
  }
}

#[async_trait]
impl OrderStore for MemoryStore {
  async fn begin(&self) -> OrderResult<Box<dyn OrderTransaction>> {
    let guard = Arc::clone(&self.state).lock_owned().await;
    let staged = guard.clone();
    trace!("Memory transaction opened.");
    Ok(Box::new(MemoryTransaction {
      guard,
      staged,
      fault: Arc::clone(&self.fault),
      finished: false,
    }))
  }

  async fn catalog(&self) -> OrderResult<Box<dyn CatalogReader>> {
    Ok(Box::new(MemoryCatalog {
      state: Arc::clone(&self.state),
    }))
  }

  async fn find_order(&self, lookup: OrderLookup) -> OrderResult<Option<OrderWithItems>> {
    Ok(self.state.lock().await.lookup(lookup))
  }

  async fn list_orders_for_owner(&self, owner: CustomerId) -> OrderResult<Vec<Order>> {
    let state = self.state.lock().await;
    Ok(MemoryState::newest_first(
      state.orders.values().filter(|o| o.is_owned_by(owner)),
    ))
  }

  async fn list_orders(&self, filter: &OrderFilter) -> OrderResult<Page<Order>> {
    let state = self.state.lock().await;
    let matching = MemoryState::newest_first(
      state
        .orders
        .values()
        .filter(|o| filter.status.map_or(true, |status| o.status == status)),
    );
    let total = matching.len() as u64;
    let data = matching
      .into_iter()
      .skip(usize::try_from(filter.offset()).unwrap_or(usize::MAX))
      .take(filter.limit as usize)
      .collect();
    Ok(Page::new(data, total, filter))
  }
}

struct MemoryCatalog {
  state: Arc<Mutex<MemoryState>>,
}

#[async_trait]
impl CatalogReader for MemoryCatalog {
  async fn variant_with_product(&mut self, variant_id: VariantId) -> OrderResult<Option<VariantView>> {
    Ok(self.state.lock().await.view(variant_id))
  }
}

struct MemoryTransaction {
  guard: OwnedMutexGuard<MemoryState>,
  staged: MemoryState,
  fault: Arc<SyncMutex<Option<StoreFault>>>,
  finished: bool,
}

impl MemoryTransaction {
  fn staged(&mut self) -> OrderResult<&mut MemoryState> {
    if self.finished {
      return Err(OrderError::storage("transaction already finished"));
    }
    Ok(&mut self.staged)
  }

  fn trip(&self, point: StoreFault) -> OrderResult<()> {
    let mut armed = self.fault.lock();
    if *armed == Some(point) {
      *armed = None;
      return Err(OrderError::storage(format!("injected fault at {:?}", point)));
    }
    Ok(())
  }
}

#[async_trait]
impl CatalogReader for MemoryTransaction {
  async fn variant_with_product(&mut self, variant_id: VariantId) -> OrderResult<Option<VariantView>> {
    Ok(self.staged()?.view(variant_id))
  }
}

#[async_trait]
impl OrderTransaction for MemoryTransaction {
  async fn adjust_stock(&mut self, variant_id: VariantId, delta: i32) -> OrderResult<Option<i32>> {
    self.trip(StoreFault::AdjustStock)?;
    let state = self.staged()?;
    let variant = state
      .variants
      .get_mut(&variant_id)
      .ok_or_else(|| OrderError::storage(format!("variant {} vanished inside transaction", variant_id)))?;
    let adjusted = match variant.stock_quantity.checked_add(delta) {
      Some(quantity) if quantity >= 0 => quantity,
      _ => return Ok(None),
    };
    variant.stock_quantity = adjusted;
    variant.updated_at = Utc::now();
    Ok(Some(adjusted))
  }

  async fn insert_order(&mut self, order: NewOrder) -> OrderResult<Order> {
    self.trip(StoreFault::InsertOrder)?;
    let state = self.staged()?;
    if state.orders.values().any(|o| o.order_number == order.order_number) {
      return Err(OrderError::storage("duplicate order number"));
    }
    state.last_order_id += 1;
    let now = Utc::now();
    let order = Order {
      id: state.last_order_id,
      customer_id: order.customer_id,
      order_number: order.order_number,
      contact_email: order.contact_email,
      shipping_name: order.shipping.full_name,
      shipping_phone: order.shipping.phone,
      shipping_address: order.shipping.address,
      shipping_city: order.shipping.city,
      subtotal: order.totals.subtotal,
      shipping_cost: order.totals.shipping_cost,
      final_amount: order.totals.final_amount,
      payment_method: order.payment_method,
      status: INITIAL_STATUS,
      cancel_reason: None,
      created_at: now,
      updated_at: now,
    };
    state.orders.insert(order.id, order.clone());
    Ok(order)
  }

  async fn insert_items(&mut self, order_id: OrderId, items: &[NewOrderItem]) -> OrderResult<Vec<OrderItem>> {
    self.trip(StoreFault::InsertItems)?;
    let state = self.staged()?;
    if !state.orders.contains_key(&order_id) {
      return Err(OrderError::storage(format!("order {} does not exist", order_id)));
    }
    let mut inserted = Vec::with_capacity(items.len());
    for item in items {
      if item.quantity < 1 {
        return Err(OrderError::storage("order item quantity must be at least 1"));
      }
      state.last_item_id += 1;
      let row = OrderItem {
        id: state.last_item_id,
        order_id,
        product_id: item.product_id,
        variant_id: item.variant_id,
        quantity: item.quantity,
        unit_price: item.unit_price,
      };
      state.items.insert(row.id, row.clone());
      inserted.push(row);
    }
    Ok(inserted)
  }

  async fn lock_order(&mut self, order_id: OrderId, owner: Option<CustomerId>) -> OrderResult<Option<OrderWithItems>> {
    let lookup = match owner {
      Some(owner) => OrderLookup::OwnedBy { order_id, owner },
      None => OrderLookup::Id(order_id),
    };
    Ok(self.staged()?.lookup(lookup))
  }

  async fn set_status(
    &mut self,
    order_id: OrderId,
    status: OrderStatus,
    cancel_reason: Option<&str>,
  ) -> OrderResult<Order> {
    self.trip(StoreFault::SetStatus)?;
    let order = self
      .staged()?
      .orders
      .get_mut(&order_id)
      .ok_or(OrderError::OrderNotFound)?;
    order.status = status;
    if let Some(reason) = cancel_reason {
      order.cancel_reason = Some(reason.to_string());
    }
    order.updated_at = Utc::now();
    Ok(order.clone())
  }

  async fn commit(&mut self) -> OrderResult<()> {
    self.trip(StoreFault::Commit)?;
    let staged = std::mem::take(self.staged()?);
    *self.guard = staged;
    self.finished = true;
    debug!("Memory transaction committed.");
    Ok(())
  }

  async fn rollback(&mut self) -> OrderResult<()> {
    self.finished = true;
    self.staged = MemoryState::default();
    debug!("Memory transaction rolled back.");
    Ok(())
  }
}
