// storefront/src/models/mod.rs

//! Row shapes as they come out of Postgres, and their conversion into engine types.

pub mod order;
pub mod product;

pub use order::{OrderItemRow, OrderRow};
pub use product::{ProductRow, VariantRow, VariantViewRow};
