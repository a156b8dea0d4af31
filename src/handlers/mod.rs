pub mod actions;

use actix_web::{web, HttpResponse};
use utoipa::OpenApi;

use crate::application::{CheckoutService, ShopService};
use crate::domain::checkout::{CheckoutRequest, CheckoutResult, ValidationError};
use crate::domain::order::{ErrorResult, Order};
use crate::domain::ports::SharedTransport;
use crate::errors::AppError;

pub struct AppState {
    pub checkout: CheckoutService<SharedTransport>,
    pub shop: ShopService<SharedTransport>,
}

impl AppState {
    pub fn new(transport: SharedTransport) -> Self {
        Self {
            checkout: CheckoutService::new(transport.clone()),
            shop: ShopService::new(transport),
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        actions::checkout,
        actions::customer_login,
        actions::superadmin_login,
        actions::customer_signup,
        actions::get_all_products,
        actions::get_all_categories,
        actions::get_user_details,
        actions::get_customer_orders,
        actions::get_customer_cart,
        actions::order_details,
        actions::add_item_to_cart,
        actions::adjust_order_line,
        actions::remove_order_line,
    ),
    components(schemas(CheckoutRequest, CheckoutResult, ValidationError, Order, ErrorResult)),
    tags((name = "actions", description = "Vendure shop-api actions"))
)]
pub struct ApiDoc;

pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

pub async fn openapi() -> Result<HttpResponse, AppError> {
    let doc = ApiDoc::openapi().to_json()?;
    Ok(HttpResponse::Ok()
        .content_type("application/json")
        .body(doc))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health))
        .route("/api-docs/openapi.json", web::get().to(openapi))
        .service(
            web::scope("/actions")
                .route("/checkout", web::post().to(actions::checkout))
                .route("/customer-login", web::post().to(actions::customer_login))
                .route("/superadmin-login", web::post().to(actions::superadmin_login))
                .route("/customer-signup", web::post().to(actions::customer_signup))
                .route("/products", web::post().to(actions::get_all_products))
                .route("/categories", web::post().to(actions::get_all_categories))
                .route("/user-details", web::post().to(actions::get_user_details))
                .route("/customer-orders", web::post().to(actions::get_customer_orders))
                .route("/cart", web::post().to(actions::get_customer_cart))
                .route("/order-details", web::post().to(actions::order_details))
                .route("/add-item", web::post().to(actions::add_item_to_cart))
                .route("/adjust-order-line", web::post().to(actions::adjust_order_line))
                .route("/remove-order-line", web::post().to(actions::remove_order_line)),
        );
}
