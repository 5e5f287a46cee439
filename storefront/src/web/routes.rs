// storefront/src/web/routes.rs

use actix_web::web;

use super::handlers::{admin_handlers, cart_handlers, order_handlers};

async fn health_check_handler() -> actix_web::HttpResponse {
  actix_web::HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

pub fn configure_app_routes(cfg: &mut web::ServiceConfig) {
  cfg.service(
    web::scope("/api/v1") // Base path for API version 1
      .route("/health", web::get().to(health_check_handler))
      .service(web::scope("/cart").route("/preview", web::post().to(cart_handlers::preview_cart_handler)))
      .service(
        web::scope("/orders")
          .route("", web::post().to(order_handlers::create_order_handler))
          // Literal segments before `/{id}`.
          .route("/track/{token}", web::get().to(order_handlers::track_order_handler))
          .route("/my-orders", web::get().to(order_handlers::my_orders_handler))
          .route("/{id}", web::get().to(order_handlers::get_order_handler))
          .route("/{id}/cancel", web::patch().to(order_handlers::cancel_order_handler)),
      )
      .service(
        web::scope("/admin")
          .route("/orders", web::get().to(admin_handlers::list_orders_handler))
          .route("/orders/{id}", web::get().to(admin_handlers::get_order_handler))
          .route("/orders/{id}/status", web::patch().to(admin_handlers::update_status_handler))
          .route(
            "/settings/shipping",
            web::get().to(admin_handlers::get_shipping_settings_handler),
          )
          .route(
            "/settings/shipping",
            web::put().to(admin_handlers::update_shipping_settings_handler),
          ),
      ),
  );
}
