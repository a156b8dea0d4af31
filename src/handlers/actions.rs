use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::Value;
use utoipa::ToSchema;

use super::AppState;
use crate::application::NewCustomer;
use crate::domain::checkout::{id_text, CheckoutRequest, CheckoutResult};
use crate::errors::AppError;

// ── Request DTOs ─────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DomainRequest {
    /// Shop base URL, e.g. `https://your-shop.com`.
    pub vendure_domain: String,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CustomerLoginRequest {
    pub vendure_domain: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminLoginRequest {
    pub vendure_domain: String,
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub vendure_domain: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub phone_number: Option<String>,
    pub password: String,
    #[serde(default)]
    pub title: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CustomerRequest {
    pub vendure_domain: String,
    /// Customer token returned by login.
    #[serde(alias = "token")]
    pub access_token: String,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetailsRequest {
    pub vendure_domain: String,
    pub access_token: String,
    /// Order id as a string or number.
    #[serde(default)]
    #[schema(value_type = String)]
    pub order_id: Value,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddItemRequest {
    pub vendure_domain: String,
    pub access_token: String,
    pub product_variant_id: String,
    #[serde(default = "default_quantity")]
    pub quantity: i64,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdjustOrderLineRequest {
    pub vendure_domain: String,
    pub access_token: String,
    pub order_line_id: String,
    pub quantity: i64,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RemoveOrderLineRequest {
    pub vendure_domain: String,
    pub access_token: String,
    pub order_line_id: String,
}

fn default_quantity() -> i64 {
    1
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// POST /actions/checkout
///
/// Runs the full checkout: shipping, addresses, state transition and payment.
/// Validation and remote failures are reported in the body with
/// `success: false`.
#[utoipa::path(
    post,
    path = "/actions/checkout",
    request_body = CheckoutRequest,
    responses(
        (status = 200, description = "Checkout outcome", body = CheckoutResult),
        (status = 400, description = "Malformed request body"),
    ),
    tag = "actions"
)]
pub async fn checkout(
    state: web::Data<AppState>,
    body: web::Json<CheckoutRequest>,
) -> Result<HttpResponse, AppError> {
    let result = state.checkout.checkout(&body.into_inner()).await;
    Ok(HttpResponse::Ok().json(result))
}

/// POST /actions/customer-login
#[utoipa::path(
    post,
    path = "/actions/customer-login",
    request_body = CustomerLoginRequest,
    responses((status = 200, description = "Session token and channels, or the login error")),
    tag = "actions"
)]
pub async fn customer_login(
    state: web::Data<AppState>,
    body: web::Json<CustomerLoginRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let result = state
        .shop
        .customer_login(&body.vendure_domain, &body.email, &body.password)
        .await;
    Ok(HttpResponse::Ok().json(result))
}

/// POST /actions/superadmin-login
///
/// Logs in against the admin-api and returns the first channel token.
#[utoipa::path(
    post,
    path = "/actions/superadmin-login",
    request_body = AdminLoginRequest,
    responses((status = 200, description = "Channel token, channels and admin session token")),
    tag = "actions"
)]
pub async fn superadmin_login(
    state: web::Data<AppState>,
    body: web::Json<AdminLoginRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let result = state
        .shop
        .superadmin_login(&body.vendure_domain, &body.username, &body.password)
        .await;
    Ok(HttpResponse::Ok().json(result))
}

/// POST /actions/customer-signup
#[utoipa::path(
    post,
    path = "/actions/customer-signup",
    request_body = SignupRequest,
    responses((status = 200, description = "Registration outcome")),
    tag = "actions"
)]
pub async fn customer_signup(
    state: web::Data<AppState>,
    body: web::Json<SignupRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let customer = NewCustomer {
        email: body.email,
        first_name: body.first_name,
        last_name: body.last_name,
        phone_number: body.phone_number,
        password: body.password,
        title: body.title,
    };
    let result = state
        .shop
        .customer_signup(&body.vendure_domain, &customer)
        .await;
    Ok(HttpResponse::Ok().json(result))
}

/// POST /actions/products
#[utoipa::path(
    post,
    path = "/actions/products",
    request_body = DomainRequest,
    responses((status = 200, description = "All products with their variants")),
    tag = "actions"
)]
pub async fn get_all_products(
    state: web::Data<AppState>,
    body: web::Json<DomainRequest>,
) -> Result<HttpResponse, AppError> {
    let result = state.shop.get_all_products(&body.vendure_domain).await;
    Ok(HttpResponse::Ok().json(result))
}

/// POST /actions/categories
#[utoipa::path(
    post,
    path = "/actions/categories",
    request_body = DomainRequest,
    responses((status = 200, description = "All collections with their parent")),
    tag = "actions"
)]
pub async fn get_all_categories(
    state: web::Data<AppState>,
    body: web::Json<DomainRequest>,
) -> Result<HttpResponse, AppError> {
    let result = state.shop.get_all_categories(&body.vendure_domain).await;
    Ok(HttpResponse::Ok().json(result))
}

/// POST /actions/user-details
#[utoipa::path(
    post,
    path = "/actions/user-details",
    request_body = CustomerRequest,
    responses((status = 200, description = "Active customer, or null for an invalid token")),
    tag = "actions"
)]
pub async fn get_user_details(
    state: web::Data<AppState>,
    body: web::Json<CustomerRequest>,
) -> Result<HttpResponse, AppError> {
    let result = state
        .shop
        .get_user_details(&body.vendure_domain, &body.access_token)
        .await;
    Ok(HttpResponse::Ok().json(result))
}

/// POST /actions/customer-orders
#[utoipa::path(
    post,
    path = "/actions/customer-orders",
    request_body = CustomerRequest,
    responses((status = 200, description = "Placed orders, newest first")),
    tag = "actions"
)]
pub async fn get_customer_orders(
    state: web::Data<AppState>,
    body: web::Json<CustomerRequest>,
) -> Result<HttpResponse, AppError> {
    let result = state
        .shop
        .get_customer_orders(&body.vendure_domain, &body.access_token)
        .await;
    Ok(HttpResponse::Ok().json(result))
}

/// POST /actions/cart
#[utoipa::path(
    post,
    path = "/actions/cart",
    request_body = CustomerRequest,
    responses((status = 200, description = "The customer's active order")),
    tag = "actions"
)]
pub async fn get_customer_cart(
    state: web::Data<AppState>,
    body: web::Json<CustomerRequest>,
) -> Result<HttpResponse, AppError> {
    let result = state
        .shop
        .get_customer_cart(&body.vendure_domain, &body.access_token)
        .await;
    Ok(HttpResponse::Ok().json(result))
}

/// POST /actions/order-details
#[utoipa::path(
    post,
    path = "/actions/order-details",
    request_body = OrderDetailsRequest,
    responses(
        (status = 200, description = "Order with lines and addresses"),
        (status = 400, description = "Missing order id"),
    ),
    tag = "actions"
)]
pub async fn order_details(
    state: web::Data<AppState>,
    body: web::Json<OrderDetailsRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let order_id = match &body.order_id {
        id @ (Value::String(_) | Value::Number(_)) => id_text(id),
        _ => None,
    };
    let order_id = order_id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| AppError::BadRequest("orderId must be a string or number".to_string()))?;
    let result = state
        .shop
        .order_details(&body.vendure_domain, &body.access_token, &order_id)
        .await;
    Ok(HttpResponse::Ok().json(result))
}

/// POST /actions/add-item
#[utoipa::path(
    post,
    path = "/actions/add-item",
    request_body = AddItemRequest,
    responses((status = 200, description = "Updated order, or the remote error")),
    tag = "actions"
)]
pub async fn add_item_to_cart(
    state: web::Data<AppState>,
    body: web::Json<AddItemRequest>,
) -> Result<HttpResponse, AppError> {
    let result = state
        .shop
        .add_item_to_cart(
            &body.vendure_domain,
            &body.access_token,
            &body.product_variant_id,
            body.quantity,
        )
        .await;
    Ok(HttpResponse::Ok().json(result))
}

/// POST /actions/adjust-order-line
#[utoipa::path(
    post,
    path = "/actions/adjust-order-line",
    request_body = AdjustOrderLineRequest,
    responses((status = 200, description = "Updated order, or the remote error")),
    tag = "actions"
)]
pub async fn adjust_order_line(
    state: web::Data<AppState>,
    body: web::Json<AdjustOrderLineRequest>,
) -> Result<HttpResponse, AppError> {
    let result = state
        .shop
        .adjust_order_line(
            &body.vendure_domain,
            &body.access_token,
            &body.order_line_id,
            body.quantity,
        )
        .await;
    Ok(HttpResponse::Ok().json(result))
}

/// POST /actions/remove-order-line
#[utoipa::path(
    post,
    path = "/actions/remove-order-line",
    request_body = RemoveOrderLineRequest,
    responses((status = 200, description = "Updated order, or the remote error")),
    tag = "actions"
)]
pub async fn remove_order_line(
    state: web::Data<AppState>,
    body: web::Json<RemoveOrderLineRequest>,
) -> Result<HttpResponse, AppError> {
    let result = state
        .shop
        .remove_order_line(&body.vendure_domain, &body.access_token, &body.order_line_id)
        .await;
    Ok(HttpResponse::Ok().json(result))
}
