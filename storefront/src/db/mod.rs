// storefront/src/db/mod.rs

pub mod pg_store;
pub mod seed;

pub use pg_store::PgOrderStore;
pub use seed::seed_demo_catalog;
