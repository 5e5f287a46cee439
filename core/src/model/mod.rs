// stockline/src/model/mod.rs

//! Entities owned or read by the engine. Cross-entity references are plain ids;
//! an order owns its items, a product owns its variants, and nothing points back.

pub mod catalog;
pub mod order;

pub type ProductId = i64;
pub type VariantId = i64;
pub type OrderId = i64;
pub type OrderItemId = i64;
pub type CustomerId = i64;

pub use catalog::{NewProduct, NewVariant, Product, ProductVariant, VariantView};
pub use order::{
  CartLine, Customer, NewOrder, NewOrderItem, Order, OrderItem, OrderRequest, OrderStatus, OrderWithItems,
  PaymentMethod, ShippingInfo,
};
