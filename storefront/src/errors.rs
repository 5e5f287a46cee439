// storefront/src/errors.rs

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

use stockline::OrderError;

#[derive(Debug, Error)]
pub enum AppError {
  #[error(transparent)]
  Order(#[from] OrderError),

  #[error("Validation Error: {0}")]
  Validation(String),

  #[error("Authentication Failed: {0}")]
  Auth(String),

  #[error("Forbidden: {0}")]
  Forbidden(String),

  #[error("Configuration Error: {0}")]
  Config(String),

  #[error("Database Error: {0}")]
  Sqlx(#[from] sqlx::Error),

  #[error("Internal Server Error: {0}")]
  Internal(String),
}

// Handlers and startup code reach for anyhow in a few places; keep the typed error when one is inside.
impl From<anyhow::Error> for AppError {
  fn from(err: anyhow::Error) -> Self {
    let err = match err.downcast::<OrderError>() {
      Ok(order_err) => return AppError::Order(order_err),
      Err(err) => err,
    };
    match err.downcast::<sqlx::Error>() {
      Ok(sqlx_err) => AppError::Sqlx(sqlx_err),
      Err(err) => AppError::Internal(err.to_string()),
    }
  }
}

impl AppError {
  /// Message safe to show a client. Server-side failures are not described.
  fn public_message(&self) -> String {
    match self {
      AppError::Order(OrderError::Storage { .. }) | AppError::Sqlx(_) => "Database operation failed.".to_string(),
      AppError::Config(_) => "Configuration issue.".to_string(),
      AppError::Internal(_) => "An internal error occurred.".to_string(),
      AppError::Order(e) => e.to_string(),
      AppError::Validation(m) | AppError::Auth(m) | AppError::Forbidden(m) => m.clone(),
    }
  }
}

impl ResponseError for AppError {
  fn status_code(&self) -> StatusCode {
    match self {
      AppError::Order(e) => match e {
        OrderError::VariantNotFound { .. } | OrderError::OrderNotFound => StatusCode::NOT_FOUND,
        OrderError::InsufficientStock { .. } | OrderError::CannotCancel { .. } => StatusCode::CONFLICT,
        OrderError::TransitionNotAllowed { .. } => StatusCode::CONFLICT,
        OrderError::ProductInactive { .. } | OrderError::InvalidStatus(_) | OrderError::Validation(_) => {
          StatusCode::BAD_REQUEST
        }
        OrderError::Storage { .. } => StatusCode::INTERNAL_SERVER_ERROR,
      },
      AppError::Validation(_) => StatusCode::BAD_REQUEST,
      AppError::Auth(_) => StatusCode::UNAUTHORIZED,
      AppError::Forbidden(_) => StatusCode::FORBIDDEN,
      AppError::Config(_) | AppError::Sqlx(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }

  fn error_response(&self) -> HttpResponse {
    let status = self.status_code();
    // Log the full error when it's turned into a response
    if status.is_server_error() {
      tracing::error!(application_error = %self, "Responding with error");
    } else {
      tracing::warn!(application_error = %self, status = status.as_u16(), "Request rejected");
    }
    HttpResponse::build(status).json(json!({
      "success": false,
      "message": self.public_message(),
    }))
  }
}

// Define a Result type alias for the application
pub type Result<T, E = AppError> = std::result::Result<T, E>;
