// storefront/src/web/handlers/admin_handlers.rs

use actix_web::{web, HttpResponse};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument};

use stockline::{OrderFilter, OrderStatus, ShippingPolicy};

use crate::errors::AppError;
use crate::state::AppState;
use crate::web::extractors::AdminUser;

#[derive(Deserialize, Debug, Default)]
pub struct ListOrdersQuery {
  pub page: Option<u32>,
  pub limit: Option<u32>,
  pub status: Option<String>,
}

#[instrument(name = "handler::admin_list_orders", skip(app_state, admin, query), fields(admin_id = admin.0.id))]
pub async fn list_orders_handler(
  app_state: web::Data<AppState>,
  admin: AdminUser,
  query: web::Query<ListOrdersQuery>,
) -> Result<HttpResponse, AppError> {
  let query = query.into_inner();
  let status = match query.status.as_deref().map(str::trim) {
    None | Some("") => None,
    Some(raw) => Some(raw.parse::<OrderStatus>()?),
  };
  let filter = OrderFilter::new(query.page, query.limit, status)?;
  let page = app_state.engine.list_orders(filter).await?;

  Ok(HttpResponse::Ok().json(json!({
      "success": true,
      "totalItems": page.total_items,
      "totalPages": page.total_pages,
      "currentPage": page.current_page,
      "data": page.data
  })))
}

#[instrument(name = "handler::admin_get_order", skip(app_state, admin, path), fields(admin_id = admin.0.id, order_id = *path.as_ref()))]
pub async fn get_order_handler(
  app_state: web::Data<AppState>,
  admin: AdminUser,
  path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
  let order = app_state.engine.get_order_admin(path.into_inner()).await?;

  Ok(HttpResponse::Ok().json(json!({ "success": true, "data": order })))
}

#[derive(Deserialize, Debug)]
pub struct UpdateStatusPayload {
  pub status: String,
}

#[instrument(name = "handler::admin_update_status", skip(app_state, admin, path, payload), fields(admin_id = admin.0.id, order_id = *path.as_ref(), status = %payload.status))]
pub async fn update_status_handler(
  app_state: web::Data<AppState>,
  admin: AdminUser,
  path: web::Path<i64>,
  payload: web::Json<UpdateStatusPayload>,
) -> Result<HttpResponse, AppError> {
  let order_id = path.into_inner();
  let order = app_state.engine.update_status(order_id, payload.status.trim()).await?;

  info!(admin_id = admin.0.id, order_id, new_status = %order.status, "Order status updated by admin.");

  Ok(HttpResponse::Ok().json(json!({
      "success": true,
      "message": "Status updated.",
      "data": order
  })))
}

#[instrument(name = "handler::admin_get_shipping", skip(app_state, _admin))]
pub async fn get_shipping_settings_handler(
  app_state: web::Data<AppState>,
  _admin: AdminUser,
) -> Result<HttpResponse, AppError> {
  Ok(HttpResponse::Ok().json(json!({
      "success": true,
      "data": app_state.engine.shipping().current()
  })))
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ShippingSettingsPayload {
  pub flat_fee: Decimal,
  pub free_threshold: Decimal,
}

#[instrument(name = "handler::admin_update_shipping", skip(app_state, admin, payload), fields(admin_id = admin.0.id))]
pub async fn update_shipping_settings_handler(
  app_state: web::Data<AppState>,
  admin: AdminUser,
  payload: web::Json<ShippingSettingsPayload>,
) -> Result<HttpResponse, AppError> {
  let policy = ShippingPolicy::new(payload.flat_fee, payload.free_threshold)?;
  let previous = app_state.engine.shipping().replace(policy);

  info!(
    from_fee = %previous.flat_fee,
    from_threshold = %previous.free_threshold,
    to_fee = %policy.flat_fee,
    to_threshold = %policy.free_threshold,
    "Shipping settings updated."
  );

  Ok(HttpResponse::Ok().json(json!({
      "success": true,
      "message": "Shipping settings updated.",
      "data": policy
  })))
}
