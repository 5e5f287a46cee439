// storefront/src/state.rs
use crate::config::AppConfig;
use std::sync::Arc;
use stockline::OrderEngine;

#[derive(Clone, Debug)]
pub struct AppState {
  pub engine: OrderEngine,
  pub config: Arc<AppConfig>, // Share loaded config
}

impl AppState {
  pub fn new(engine: OrderEngine, config: Arc<AppConfig>) -> Self {
    Self { engine, config }
  }
}
