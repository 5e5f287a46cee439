// storefront/src/web/extractors.rs

//! Mock identity. Authentication proper is out of scope; the caller's identity
//! arrives in headers (`X-User-ID`, `X-User-Email`, `X-User-Role`).

use actix_web::{dev::Payload, FromRequest, HttpRequest};
use futures_util::future::{ready, Ready};
use tracing::warn;

use stockline::Customer;

use crate::errors::AppError;

pub const USER_ID_HEADER: &str = "X-User-ID";
pub const USER_EMAIL_HEADER: &str = "X-User-Email";
pub const USER_ROLE_HEADER: &str = "X-User-Role";

fn header<'a>(req: &'a HttpRequest, name: &str) -> Option<&'a str> {
  req.headers().get(name).and_then(|value| value.to_str().ok())
}

/// `Ok(None)` when no identity was sent, an error when one was sent but is malformed.
fn identity(req: &HttpRequest) -> Result<Option<Customer>, AppError> {
  let Some(raw_id) = header(req, USER_ID_HEADER) else {
    return Ok(None);
  };
  let id = raw_id.trim().parse::<i64>().map_err(|_| {
    warn!("Identity extractor: invalid X-User-ID header.");
    AppError::Auth("Invalid X-User-ID header.".to_string())
  })?;
  let email = header(req, USER_EMAIL_HEADER).unwrap_or_default().trim().to_string();
  Ok(Some(Customer { id, email }))
}

#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub Customer);

impl FromRequest for AuthenticatedUser {
  type Error = AppError;
  type Future = Ready<Result<Self, Self::Error>>;

  fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
    ready(identity(req).and_then(|customer| {
      customer.map(AuthenticatedUser).ok_or_else(|| {
        warn!("AuthenticatedUser extractor: Missing X-User-ID header.");
        AppError::Auth("User authentication required.".to_string())
      })
    }))
  }
}

/// Guest checkout: identity is optional, and a malformed one is treated as absent.
#[derive(Debug, Clone)]
pub struct OptionalUser(pub Option<Customer>);

impl FromRequest for OptionalUser {
  type Error = AppError;
  type Future = Ready<Result<Self, Self::Error>>;

  fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
    let customer = identity(req).unwrap_or_else(|_| {
      warn!("OptionalUser extractor: ignoring malformed identity, continuing as guest.");
      None
    });
    ready(Ok(OptionalUser(customer)))
  }
}

#[derive(Debug, Clone)]
pub struct AdminUser(pub Customer);

impl FromRequest for AdminUser {
  type Error = AppError;
  type Future = Ready<Result<Self, Self::Error>>;

  fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
    let result = identity(req).and_then(|customer| {
      let customer = customer.ok_or_else(|| AppError::Auth("User authentication required.".to_string()))?;
      if header(req, USER_ROLE_HEADER).map(str::trim) == Some("admin") {
        Ok(AdminUser(customer))
      } else {
        warn!(user_id = customer.id, "AdminUser extractor: caller is not an admin.");
        Err(AppError::Forbidden("Admin privileges required.".to_string()))
      }
    });
    ready(result)
  }
}
