// storefront/src/main.rs

use actix_web::{web as actix_data, App, HttpServer}; // Renamed web to actix_data
use std::sync::Arc;
use tracing_subscriber::fmt::format::FmtSpan; // For span events in tracing

use stockline::{OrderEngine, ShippingSettings};
use storefront::config::{log_filter, AppConfig, LogFormat};
use storefront::db::{seed_demo_catalog, PgOrderStore};
use storefront::services::{MailNotifier, MockMailTransport};
use storefront::state::AppState;
use storefront::web::configure_app_routes;

fn init_tracing(format: LogFormat) {
  let builder = tracing_subscriber::fmt()
    .with_env_filter(log_filter(std::env::var("RUST_LOG").ok().as_deref())) // RUST_LOG overrides INFO
    .with_span_events(FmtSpan::CLOSE); // Log when spans close, showing duration
  match format {
    LogFormat::Json => builder.json().init(),
    LogFormat::Pretty => builder.init(),
  }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
  // Configuration first: it decides the log format.
  let app_config = match AppConfig::from_env() {
    Ok(cfg) => Arc::new(cfg),
    Err(e) => {
      eprintln!("Configuration error: {}", e);
      std::process::exit(1);
    }
  };
  init_tracing(app_config.log_format);

  tracing::info!("Starting storefront server...");

  let store = match PgOrderStore::connect(&app_config).await {
    Ok(store) => {
      tracing::info!("Successfully connected to the database.");
      store
    }
    Err(e) => {
      tracing::error!(error = %e, "Failed to connect to the database.");
      std::process::exit(1);
    }
  };

  if app_config.run_migrations {
    if let Err(e) = store.migrate().await {
      tracing::error!(error = %e, "Failed to run database migrations.");
      std::process::exit(1);
    }
    tracing::info!("Database migrations applied.");
  }

  if app_config.seed_db {
    if let Err(e) = seed_demo_catalog(store.pool()).await {
      tracing::error!(error = %e, "Failed to seed database.");
    }
  }

  let shipping_policy = match app_config.shipping_policy() {
    Ok(policy) => policy,
    Err(e) => {
      tracing::error!(error = %e, "Invalid shipping settings.");
      std::process::exit(1);
    }
  };
  let notifier = MailNotifier::new(Arc::new(MockMailTransport), &app_config);
  let engine = OrderEngine::new(
    Arc::new(store),
    ShippingSettings::new(shipping_policy),
    Arc::new(notifier),
  );
  let app_state = AppState::new(engine, app_config.clone());

  let server_address = app_config.server_address();
  tracing::info!("Attempting to bind server to {}...", server_address);

  HttpServer::new(move || {
    App::new()
      .app_data(actix_data::Data::new(app_state.clone())) // Share AppState with handlers
      .wrap(tracing_actix_web::TracingLogger::default()) // Actix middleware for tracing requests
      .configure(configure_app_routes)
  })
  .bind(&server_address)?
  .run()
  .await
}
