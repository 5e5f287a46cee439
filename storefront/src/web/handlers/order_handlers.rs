// storefront/src/web/handlers/order_handlers.rs

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use stockline::{OrderError, OrderRequest};

use crate::errors::AppError;
use crate::state::AppState;
use crate::web::extractors::{AuthenticatedUser, OptionalUser};

#[instrument(
    name = "handler::create_order",
    skip(app_state, payload, user),
    fields(user_id = ?user.0.as_ref().map(|c| c.id), lines = payload.lines.len())
)]
pub async fn create_order_handler(
  app_state: web::Data<AppState>,
  user: OptionalUser,
  payload: web::Json<OrderRequest>,
) -> Result<HttpResponse, AppError> {
  let placed = app_state
    .engine
    .create_order(payload.into_inner(), user.0.as_ref())
    .await?;

  info!(
    order_number = %placed.order.order_number,
    amount = %placed.order.final_amount,
    "New order received."
  );

  Ok(HttpResponse::Created().json(json!({
      "success": true,
      "message": "Order received.",
      "orderNumber": placed.order.order_number,
      "data": placed
  })))
}

#[instrument(name = "handler::track_order", skip(app_state, path), fields(token = %path.as_ref()))]
pub async fn track_order_handler(
  app_state: web::Data<AppState>,
  path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
  // A malformed token can't match anything, so it reads as "not found".
  let token = Uuid::parse_str(path.trim()).map_err(|_| {
    warn!("Guest tracking with a malformed token.");
    OrderError::OrderNotFound
  })?;
  let order = app_state.engine.track_order(token).await?;

  Ok(HttpResponse::Ok().json(json!({ "success": true, "data": order })))
}

#[instrument(name = "handler::my_orders", skip(app_state, user), fields(user_id = user.0.id))]
pub async fn my_orders_handler(
  app_state: web::Data<AppState>,
  user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let orders = app_state.engine.list_orders_for_owner(user.0.id).await?;

  Ok(HttpResponse::Ok().json(json!({ "success": true, "data": orders })))
}

#[instrument(name = "handler::get_order", skip(app_state, user, path), fields(user_id = user.0.id, order_id = *path.as_ref()))]
pub async fn get_order_handler(
  app_state: web::Data<AppState>,
  user: AuthenticatedUser,
  path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
  let order = app_state.engine.get_order(path.into_inner(), user.0.id).await?;

  Ok(HttpResponse::Ok().json(json!({ "success": true, "data": order })))
}

#[derive(Deserialize, Debug, Default)]
pub struct CancelOrderPayload {
  pub reason: Option<String>,
}

#[instrument(name = "handler::cancel_order", skip(app_state, user, path, payload), fields(user_id = user.0.id, order_id = *path.as_ref()))]
pub async fn cancel_order_handler(
  app_state: web::Data<AppState>,
  user: AuthenticatedUser,
  path: web::Path<i64>,
  payload: Option<web::Json<CancelOrderPayload>>,
) -> Result<HttpResponse, AppError> {
  let reason = payload.and_then(|p| p.into_inner().reason);
  let order = app_state
    .engine
    .cancel_order(path.into_inner(), user.0.id, reason.as_deref())
    .await?;

  Ok(HttpResponse::Ok().json(json!({
      "success": true,
      "message": "Your order was cancelled and the refund process has started.",
      "data": order
  })))
}
