// storefront/src/config.rs

use crate::errors::{AppError, Result}; // Use AppError specific Result
use dotenvy::dotenv;
use rust_decimal::Decimal;
use std::env;
use std::str::FromStr;
use stockline::ShippingPolicy;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
  Pretty,
  Json,
}

/// Log filter from `RUST_LOG`-style directives; INFO when none are given.
pub fn log_filter(directives: Option<&str>) -> EnvFilter {
  EnvFilter::builder()
    .with_default_directive(LevelFilter::INFO.into())
    .parse_lossy(directives.unwrap_or_default())
}

#[derive(Debug, Clone)]
pub struct AppConfig {
  pub server_host: String,
  pub server_port: u16,
  pub database_url: String,
  pub database_max_connections: u32,
  pub run_migrations: bool,
  pub seed_db: bool,

  // Initial shipping policy; admins can retune it at runtime.
  pub shipping_cost: Decimal,
  pub shipping_free_limit: Decimal,

  pub mail_from: String,
  pub admin_email: String,
  pub frontend_url: String,

  pub log_format: LogFormat,
}

impl AppConfig {
  pub fn from_env() -> Result<Self> {
    dotenv().ok(); // Load .env file if present
    Self::from_lookup(|name| env::var(name).ok())
  }

  /// Builds the config from any variable source; `from_env` passes the process environment.
  pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
    let get_env = |var_name: &str| {
      lookup(var_name).ok_or_else(|| AppError::Config(format!("Missing environment variable '{}'", var_name)))
    };
    let or_default = |var_name: &str, default: &str| get_env(var_name).unwrap_or_else(|_| default.to_string());

    let server_host = or_default("SERVER_HOST", "127.0.0.1");
    let server_port = parse_var::<u16>("SERVER_PORT", &or_default("SERVER_PORT", "8080"))?;
    let database_url = get_env("DATABASE_URL")?;
    let database_max_connections = parse_var::<u32>(
      "DATABASE_MAX_CONNECTIONS",
      &or_default("DATABASE_MAX_CONNECTIONS", "10"),
    )?;
    let run_migrations = parse_var::<bool>("RUN_MIGRATIONS", &or_default("RUN_MIGRATIONS", "true"))?;
    let seed_db = parse_var::<bool>("SEED_DB", &or_default("SEED_DB", "false"))?;

    let shipping_cost = parse_var::<Decimal>("SHIPPING_COST", &or_default("SHIPPING_COST", "50.00"))?;
    let shipping_free_limit =
      parse_var::<Decimal>("SHIPPING_FREE_LIMIT", &or_default("SHIPPING_FREE_LIMIT", "1000.00"))?;
    ShippingPolicy::new(shipping_cost, shipping_free_limit)
      .map_err(|e| AppError::Config(format!("Invalid shipping settings: {}", e)))?;

    let mail_from = or_default("MAIL_FROM", "noreply@example.com");
    let admin_email = or_default("ADMIN_EMAIL", "admin@example.com");
    let frontend_url = or_default("FRONTEND_URL", &format!("http://{}:{}", server_host, server_port));
    let frontend_url = frontend_url.trim_end_matches('/').to_string();

    let log_format = match or_default("LOG_FORMAT", "pretty").to_lowercase().as_str() {
      "json" => LogFormat::Json,
      "pretty" | "text" => LogFormat::Pretty,
      other => return Err(AppError::Config(format!("Invalid LOG_FORMAT value: '{}'", other))),
    };

    tracing::info!("Application configuration loaded successfully.");

    Ok(Self {
      server_host,
      server_port,
      database_url,
      database_max_connections,
      run_migrations,
      seed_db,
      shipping_cost,
      shipping_free_limit,
      mail_from,
      admin_email,
      frontend_url,
      log_format,
    })
  }

  pub fn shipping_policy(&self) -> Result<ShippingPolicy> {
    Ok(ShippingPolicy::new(self.shipping_cost, self.shipping_free_limit)?)
  }

  pub fn server_address(&self) -> String {
    format!("{}:{}", self.server_host, self.server_port)
  }
}

fn parse_var<T>(name: &str, raw: &str) -> Result<T>
where
  T: FromStr,
  T::Err: std::fmt::Display,
{
  raw
    .trim()
    .parse::<T>()
    .map_err(|e| AppError::Config(format!("Invalid {} value '{}': {}", name, raw, e)))
}
