// storefront/src/web/handlers/cart_handlers.rs

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument};

use stockline::CartLine;

use crate::errors::AppError;
use crate::state::AppState;

#[derive(Deserialize, Debug)]
pub struct PreviewCartPayload {
  pub items: Vec<CartLine>,
}

#[instrument(name = "handler::preview_cart", skip(app_state, payload), fields(lines = payload.items.len()))]
pub async fn preview_cart_handler(
  app_state: web::Data<AppState>,
  payload: web::Json<PreviewCartPayload>,
) -> Result<HttpResponse, AppError> {
  let preview = app_state.engine.preview_cart(&payload.items).await?;

  info!(
    subtotal = %preview.subtotal,
    final_amount = %preview.final_amount,
    all_in_stock = preview.all_in_stock(),
    "Cart previewed."
  );

  Ok(HttpResponse::Ok().json(json!({
      "success": true,
      "data": preview
  })))
}
