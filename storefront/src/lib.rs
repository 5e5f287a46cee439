// storefront/src/lib.rs

//! HTTP storefront over the `stockline` order engine: actix-web handlers, a Postgres
//! store, environment configuration and mail notifications.

pub mod config;
pub mod db;
pub mod errors;
pub mod models;
pub mod services;
pub mod state;
pub mod web;

pub use config::AppConfig;
pub use errors::{AppError, Result};
pub use state::AppState;
