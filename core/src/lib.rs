// src/lib.rs

//! Stockline: the order lifecycle and stock-reservation engine behind a small storefront.
//!
//! Stockline owns the consistency-critical part of order processing:
//!  - Cart preview: per-line availability and totals without touching stock.
//!  - Order placement: validation, relative stock decrement, price snapshot and
//!    order + line persistence as one all-or-nothing unit of work.
//!  - Status transitions driven by a data table (permissive by default).
//!  - Customer cancellation with compensating restock in the same unit of work.
//!  - Fire-and-forget notifications dispatched only after a commit.
//!
//! Storage is abstracted behind [`OrderStore`] / [`OrderTransaction`]; the crate ships
//! [`MemoryStore`] for tests and demos, while the storefront binary provides Postgres.

pub mod catalog;
pub mod engine;
pub mod error;
pub mod model;
pub mod notify;
pub mod preview;
pub mod pricing;
pub mod status;
pub mod store;

// --- Re-exports for the Public API ---

pub use crate::catalog::{lookup_variant, CatalogReader};
pub use crate::engine::OrderEngine;
pub use crate::error::{OrderError, OrderResult};
pub use crate::model::{
  CartLine, Customer, CustomerId, NewOrder, NewOrderItem, NewProduct, NewVariant, Order, OrderId, OrderItem,
  OrderItemId, OrderRequest, OrderStatus, OrderWithItems, PaymentMethod, Product, ProductId, ProductVariant,
  ShippingInfo, VariantId, VariantView,
};
pub use crate::notify::{NoopNotifier, NotificationDispatcher, Notifier, OrderEvent};
pub use crate::preview::{CartPreview, CartPreviewService, PreviewLine};
pub use crate::pricing::{OrderTotals, PricedLine, ShippingPolicy, ShippingSettings};
pub use crate::status::TransitionTable;
pub use crate::store::memory::{MemoryStore, StoreFault};
pub use crate::store::{OrderFilter, OrderLookup, OrderStore, OrderTransaction, Page};

/// Reason recorded on customer-initiated cancellations when none is supplied.
pub const DEFAULT_CANCEL_REASON: &str = "Cancelled at customer request";
