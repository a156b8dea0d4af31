use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};

use super::documents;
use super::endpoints::{admin_endpoint, shop_endpoint};
use crate::domain::action::ActionResult;
use crate::domain::catalog::{CategoryList, Collection, Product, ProductList};
use crate::domain::customer::{
    ActiveCustomer, AdminSession, CurrentUser, CustomerDetails, CustomerSession, Registration,
    RegistrationOutcome,
};
use crate::domain::errors::GraphqlError;
use crate::domain::order::{
    Cart, MutationResult, Order, OrderDetails, OrderHistory, PaginatedList, UpdatedOrder,
};
use crate::domain::ports::{GraphqlReply, GraphqlRequest, GraphqlTransport};

/// `activeCustomer` as selected by the order history query.
#[derive(Debug, Deserialize)]
struct CustomerOrders {
    #[serde(default)]
    orders: Option<PaginatedList<Order>>,
}

/// Fields of a new customer account.
#[derive(Debug, Clone)]
pub struct NewCustomer {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: Option<String>,
    pub password: String,
    pub title: Option<String>,
}

/// Single-request actions against the shop-api (and the admin login).
///
/// None of these return an error: transport failures and remote business
/// errors both end up in the returned `ActionResult`.
pub struct ShopService<T> {
    transport: T,
}

impl<T: GraphqlTransport> ShopService<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    // ── Authentication ───────────────────────────────────────────────────────

    pub async fn customer_login(
        &self,
        domain: &str,
        email: &str,
        password: &str,
    ) -> ActionResult<CustomerSession> {
        let request = GraphqlRequest::new(shop_endpoint(domain), documents::CUSTOMER_LOGIN)
            .variables(json!({ "email": email, "password": password }));
        let reply = match self.transport.execute(request).await {
            Ok(reply) => reply,
            Err(e) => return e.into(),
        };
        let token = reply.auth_token.clone();
        match narrow_field::<CurrentUser>(&reply, "login") {
            Ok(MutationResult::Ok(user)) => ActionResult::ok(CustomerSession {
                token,
                email: user.identifier,
                channels: user.channels,
            }),
            Ok(MutationResult::Error(error)) => ActionResult::rejected(error),
            Err(e) => e.into(),
        }
    }

    pub async fn superadmin_login(
        &self,
        domain: &str,
        username: &str,
        password: &str,
    ) -> ActionResult<AdminSession> {
        let request = GraphqlRequest::new(admin_endpoint(domain), documents::ADMIN_LOGIN)
            .variables(json!({ "username": username, "password": password }));
        let reply = match self.transport.execute(request).await {
            Ok(reply) => reply,
            Err(e) => return e.into(),
        };
        match narrow_field::<CurrentUser>(&reply, "login") {
            Ok(MutationResult::Ok(user)) => ActionResult::ok(AdminSession {
                token: user.channels.first().map(|c| c.token.clone()),
                channels: user.channels,
                vendure_auth_token: reply.auth_token.clone(),
            }),
            Ok(MutationResult::Error(error)) => ActionResult::rejected(error),
            Err(e) => e.into(),
        }
    }

    pub async fn customer_signup(&self, domain: &str, customer: &NewCustomer) -> ActionResult<Registration> {
        let input = json!({
            "emailAddress": customer.email,
            "firstName": customer.first_name,
            "lastName": customer.last_name,
            "phoneNumber": non_blank(customer.phone_number.as_deref()),
            "password": customer.password,
            "title": non_blank(customer.title.as_deref()),
        });
        let request = GraphqlRequest::new(shop_endpoint(domain), documents::REGISTER_CUSTOMER)
            .variables(json!({ "input": input }));
        let reply = match self.transport.execute(request).await {
            Ok(reply) => reply,
            Err(e) => return e.into(),
        };
        if reply.data.get("registerCustomerAccount").map_or(true, Value::is_null) {
            return ActionResult::failed("Unknown error");
        }
        match narrow_field::<RegistrationOutcome>(&reply, "registerCustomerAccount") {
            Ok(MutationResult::Ok(outcome)) if outcome.success => ActionResult::ok(Registration {
                message: "Registration successful".to_string(),
            }),
            Ok(MutationResult::Ok(_)) => ActionResult::failed("Registration was not accepted"),
            Ok(MutationResult::Error(error)) => ActionResult::rejected(error),
            Err(e) => e.into(),
        }
    }

    // ── Catalog ──────────────────────────────────────────────────────────────

    pub async fn get_all_products(&self, domain: &str) -> ActionResult<ProductList> {
        let request = GraphqlRequest::new(shop_endpoint(domain), documents::PRODUCTS);
        match self.query::<Option<PaginatedList<Product>>>(request, "products").await {
            Ok(list) => ActionResult::ok(ProductList {
                products: list.map(|l| l.items).unwrap_or_default(),
            }),
            Err(e) => e.into(),
        }
    }

    pub async fn get_all_categories(&self, domain: &str) -> ActionResult<CategoryList> {
        let request = GraphqlRequest::new(shop_endpoint(domain), documents::COLLECTIONS);
        match self.query::<Option<PaginatedList<Collection>>>(request, "collections").await {
            Ok(list) => ActionResult::ok(CategoryList {
                categories: list.map(|l| l.items).unwrap_or_default(),
            }),
            Err(e) => e.into(),
        }
    }

    // ── Customer ─────────────────────────────────────────────────────────────

    /// A null customer means the token is invalid or expired.
    pub async fn get_user_details(&self, domain: &str, token: &str) -> ActionResult<CustomerDetails> {
        let request =
            GraphqlRequest::new(shop_endpoint(domain), documents::ACTIVE_CUSTOMER).bearer(token);
        match self.query::<Option<ActiveCustomer>>(request, "activeCustomer").await {
            Ok(customer) => ActionResult::ok(CustomerDetails { customer }),
            Err(e) => e.into(),
        }
    }

    /// Placed (inactive) orders, newest first.
    pub async fn get_customer_orders(&self, domain: &str, token: &str) -> ActionResult<OrderHistory> {
        let request = GraphqlRequest::new(shop_endpoint(domain), documents::CUSTOMER_ORDERS)
            .bearer(token)
            .variables(json!({
                "options": {
                    "filter": { "active": { "eq": false } },
                    "sort": { "id": "DESC" }
                }
            }));
        match self.query::<Option<CustomerOrders>>(request, "activeCustomer").await {
            Ok(customer) => ActionResult::ok(OrderHistory {
                orders: customer
                    .and_then(|c| c.orders)
                    .map(|list| list.items)
                    .unwrap_or_default(),
            }),
            Err(e) => e.into(),
        }
    }

    // ── Cart ─────────────────────────────────────────────────────────────────

    pub async fn get_customer_cart(&self, domain: &str, token: &str) -> ActionResult<Cart> {
        let request =
            GraphqlRequest::new(shop_endpoint(domain), documents::ACTIVE_ORDER).bearer(token);
        match self.query::<Option<Order>>(request, "activeOrder").await {
            Ok(Some(cart)) => ActionResult::ok(Cart { cart }),
            Ok(None) => ActionResult::failed("No active order found for this customer."),
            Err(e) => e.into(),
        }
    }

    pub async fn order_details(&self, domain: &str, token: &str, order_id: &str) -> ActionResult<OrderDetails> {
        let request = GraphqlRequest::new(shop_endpoint(domain), documents::ORDER_DETAILS)
            .bearer(token)
            .variables(json!({ "id": order_id }));
        match self.query::<Option<Order>>(request, "order").await {
            Ok(Some(order)) => ActionResult::ok(OrderDetails { order }),
            Ok(None) => ActionResult::failed(format!("Order with ID {} not found.", order_id)),
            Err(e) => e.into(),
        }
    }

    pub async fn add_item_to_cart(
        &self,
        domain: &str,
        token: &str,
        product_variant_id: &str,
        quantity: i64,
    ) -> ActionResult<UpdatedOrder> {
        let request = GraphqlRequest::new(shop_endpoint(domain), documents::ADD_ITEM_TO_ORDER)
            .bearer(token)
            .variables(json!({ "productVariantId": product_variant_id, "quantity": quantity }));
        self.modify_order(
            request,
            "addItemToOrder",
            "Failed to add item to order. Check variant ID or quantity.",
        )
        .await
    }

    pub async fn adjust_order_line(
        &self,
        domain: &str,
        token: &str,
        order_line_id: &str,
        quantity: i64,
    ) -> ActionResult<UpdatedOrder> {
        let request = GraphqlRequest::new(shop_endpoint(domain), documents::ADJUST_ORDER_LINE)
            .bearer(token)
            .variables(json!({ "orderLineId": order_line_id, "quantity": quantity }));
        self.modify_order(request, "adjustOrderLine", "Failed to adjust order line.")
            .await
    }

    pub async fn remove_order_line(&self, domain: &str, token: &str, order_line_id: &str) -> ActionResult<UpdatedOrder> {
        let request = GraphqlRequest::new(shop_endpoint(domain), documents::REMOVE_ORDER_LINE)
            .bearer(token)
            .variables(json!({ "orderLineId": order_line_id }));
        self.modify_order(request, "removeOrderLine", "Failed to remove order line.")
            .await
    }

    // ── Plumbing ─────────────────────────────────────────────────────────────

    async fn query<R: DeserializeOwned>(&self, request: GraphqlRequest, field: &str) -> Result<R, GraphqlError> {
        let reply = self.transport.execute(request).await?;
        let value = reply.data.get(field).cloned().unwrap_or(Value::Null);
        Ok(serde_json::from_value(value)?)
    }

    async fn modify_order(
        &self,
        request: GraphqlRequest,
        field: &str,
        missing_message: &str,
    ) -> ActionResult<UpdatedOrder> {
        let reply = match self.transport.execute(request).await {
            Ok(reply) => reply,
            Err(e) => return e.into(),
        };
        if reply.data.get(field).map_or(true, Value::is_null) {
            return ActionResult::failed(missing_message);
        }
        match narrow_field::<Order>(&reply, field) {
            Ok(MutationResult::Ok(updated_order)) => ActionResult::ok(UpdatedOrder { updated_order }),
            Ok(MutationResult::Error(error)) => ActionResult::rejected(error),
            Err(e) => e.into(),
        }
    }
}

fn narrow_field<R: DeserializeOwned>(reply: &GraphqlReply, field: &str) -> Result<MutationResult<R>, GraphqlError> {
    let value = reply.data.get(field).cloned().unwrap_or(Value::Null);
    Ok(MutationResult::narrow(value)?)
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::testing::ScriptedTransport;

    const DOMAIN: &str = "https://shop.example.com";
    const TOKEN: &str = "cust-token-0123456789";

    fn to_json<S: serde::Serialize>(value: &S) -> Value {
        serde_json::to_value(value).unwrap()
    }

    #[tokio::test]
    async fn customer_login_returns_session_token_from_header() {
        let transport = ScriptedTransport::new()
            .respond(
                "Login",
                json!({ "login": {
                    "id": "5",
                    "identifier": "ada@example.com",
                    "channels": [{ "id": "1", "token": "default-channel" }]
                }}),
            )
            .with_auth_token("sess-abc")
            .shared();
        let service = ShopService::new(transport.clone());

        let result = service
            .customer_login(DOMAIN, "ada@example.com", "hunter22")
            .await;

        assert_eq!(
            to_json(&result),
            json!({
                "success": true,
                "token": "sess-abc",
                "email": "ada@example.com",
                "channels": [{ "id": "1", "token": "default-channel" }]
            })
        );
        let call = transport.call_to("Login").unwrap();
        assert_eq!(call.endpoint, "https://shop.example.com/shop-api");
        assert_eq!(call.bearer_token, None);
        assert_eq!(
            call.variables,
            json!({ "email": "ada@example.com", "password": "hunter22" })
        );
    }

    #[tokio::test]
    async fn customer_login_surfaces_invalid_credentials() {
        let transport = ScriptedTransport::new()
            .respond(
                "Login",
                json!({ "login": {
                    "errorCode": "INVALID_CREDENTIALS_ERROR",
                    "message": "The provided credentials are invalid",
                    "authenticationError": ""
                }}),
            )
            .shared();
        let service = ShopService::new(transport);

        let result = service.customer_login(DOMAIN, "a@b.c", "nope").await;

        assert!(!result.success);
        let error = result.error.unwrap();
        assert_eq!(error.error_code, "INVALID_CREDENTIALS_ERROR");
        assert_eq!(error.message, "The provided credentials are invalid");
    }

    #[tokio::test]
    async fn superadmin_login_uses_admin_api_and_first_channel_token() {
        let transport = ScriptedTransport::new()
            .respond(
                "AdminLogin",
                json!({ "login": {
                    "id": "1",
                    "identifier": "superadmin",
                    "channels": [
                        { "id": "1", "token": "main", "code": "__default_channel__", "permissions": ["SuperAdmin"] },
                        { "id": "2", "token": "eu", "code": "eu", "permissions": [] }
                    ]
                }}),
            )
            .with_auth_token("admin-session")
            .shared();
        let service = ShopService::new(transport.clone());

        let result = service
            .superadmin_login(DOMAIN, "superadmin", "superadmin")
            .await;

        let session = result.data.unwrap();
        assert_eq!(session.token.as_deref(), Some("main"));
        assert_eq!(session.channels.len(), 2);
        assert_eq!(session.vendure_auth_token.as_deref(), Some("admin-session"));
        assert_eq!(
            transport.call_to("AdminLogin").unwrap().endpoint,
            "https://shop.example.com/admin-api"
        );
    }

    #[tokio::test]
    async fn signup_reports_success_and_skips_blank_optionals() {
        let transport = ScriptedTransport::new()
            .respond(
                "RegisterCustomerAccount",
                json!({ "registerCustomerAccount": { "success": true } }),
            )
            .shared();
        let service = ShopService::new(transport.clone());
        let customer = NewCustomer {
            email: "new@example.com".to_string(),
            first_name: "New".to_string(),
            last_name: "Person".to_string(),
            phone_number: Some("".to_string()),
            password: "s3cret-pass".to_string(),
            title: None,
        };

        let result = service.customer_signup(DOMAIN, &customer).await;

        assert_eq!(
            to_json(&result),
            json!({ "success": true, "message": "Registration successful" })
        );
        let input = &transport.call_to("RegisterCustomerAccount").unwrap().variables["input"];
        assert_eq!(input["emailAddress"], "new@example.com");
        assert!(input["phoneNumber"].is_null());
        assert!(input["title"].is_null());
    }

    #[tokio::test]
    async fn signup_reports_password_validation_error() {
        let transport = ScriptedTransport::new()
            .respond(
                "RegisterCustomerAccount",
                json!({ "registerCustomerAccount": {
                    "errorCode": "PASSWORD_VALIDATION_ERROR",
                    "message": "Password is too short"
                }}),
            )
            .shared();
        let service = ShopService::new(transport);
        let customer = NewCustomer {
            email: "new@example.com".to_string(),
            first_name: "New".to_string(),
            last_name: "Person".to_string(),
            phone_number: None,
            password: "x".to_string(),
            title: None,
        };

        let result = service.customer_signup(DOMAIN, &customer).await;

        assert_eq!(
            to_json(&result),
            json!({
                "success": false,
                "errorCode": "PASSWORD_VALIDATION_ERROR",
                "message": "Password is too short"
            })
        );
    }

    #[tokio::test]
    async fn products_and_categories_are_listed() {
        let transport = ScriptedTransport::new()
            .respond(
                "Products",
                json!({ "products": { "items": [{
                    "id": "1", "slug": "mug", "name": "Mug", "description": "A mug",
                    "variants": [{ "id": "11", "sku": "MUG-1", "price": 900 }]
                }]}}),
            )
            .respond(
                "Collections",
                json!({ "collections": { "items": [{
                    "id": "2", "name": "Kitchen", "slug": "kitchen", "description": "",
                    "parent": { "id": "1", "name": "__root_collection__" }
                }]}}),
            )
            .shared();
        let service = ShopService::new(transport);

        let products = service.get_all_products(DOMAIN).await.data.unwrap();
        assert_eq!(products.products[0].variants[0].sku, "MUG-1");

        let categories = service.get_all_categories(DOMAIN).await.data.unwrap();
        assert_eq!(
            categories.categories[0].parent.as_ref().map(|p| p.id.as_str()),
            Some("1")
        );
    }

    #[tokio::test]
    async fn customer_orders_default_to_empty_without_customer() {
        let transport = ScriptedTransport::new()
            .respond("CustomerOrders", json!({ "activeCustomer": null }))
            .shared();
        let service = ShopService::new(transport.clone());

        let result = service.get_customer_orders(DOMAIN, TOKEN).await;

        assert_eq!(to_json(&result), json!({ "success": true, "orders": [] }));
        let call = transport.call_to("CustomerOrders").unwrap();
        assert_eq!(call.bearer_token.as_deref(), Some(TOKEN));
        assert_eq!(call.variables["options"]["sort"]["id"], "DESC");
    }

    #[tokio::test]
    async fn user_details_allow_missing_customer() {
        let transport = ScriptedTransport::new()
            .respond("ActiveCustomer", json!({ "activeCustomer": null }))
            .shared();
        let service = ShopService::new(transport);

        let result = service.get_user_details(DOMAIN, TOKEN).await;

        assert_eq!(to_json(&result), json!({ "success": true, "customer": null }));
    }

    #[tokio::test]
    async fn cart_missing_is_reported() {
        let transport = ScriptedTransport::new()
            .respond("ActiveOrder", json!({ "activeOrder": null }))
            .shared();
        let service = ShopService::new(transport);

        let result = service.get_customer_cart(DOMAIN, TOKEN).await;

        assert_eq!(
            result.message.as_deref(),
            Some("No active order found for this customer.")
        );
    }

    #[tokio::test]
    async fn order_details_pass_id_as_variable() {
        let transport = ScriptedTransport::new()
            .respond("OrderDetails", json!({ "order": null }))
            .shared();
        let service = ShopService::new(transport.clone());

        let result = service.order_details(DOMAIN, TOKEN, "42").await;

        assert_eq!(result.message.as_deref(), Some("Order with ID 42 not found."));
        assert_eq!(
            transport.call_to("OrderDetails").unwrap().variables,
            json!({ "id": "42" })
        );
    }

    #[tokio::test]
    async fn add_item_returns_updated_order() {
        let transport = ScriptedTransport::new()
            .respond(
                "AddItemToOrder",
                json!({ "addItemToOrder": {
                    "id": "9",
                    "lines": [{
                        "id": "L1", "linePriceWithTax": 1800, "quantity": 2,
                        "productVariant": { "id": "11", "name": "Mug", "priceWithTax": 900 }
                    }],
                    "totalWithTax": 1800,
                    "totalQuantity": 2,
                    "currencyCode": "USD"
                }}),
            )
            .shared();
        let service = ShopService::new(transport);

        let result = service.add_item_to_cart(DOMAIN, TOKEN, "11", 2).await;

        let order = result.data.unwrap().updated_order;
        assert_eq!(order.total_quantity, Some(2));
        assert_eq!(order.lines[0].product_variant.name, "Mug");
    }

    #[tokio::test]
    async fn adjust_line_reports_stock_hint() {
        let transport = ScriptedTransport::new()
            .respond(
                "AdjustOrderLine",
                json!({ "adjustOrderLine": {
                    "errorCode": "INSUFFICIENT_STOCK_ERROR",
                    "message": "Only 3 items were added to the order due to insufficient stock",
                    "quantityAvailable": 3
                }}),
            )
            .shared();
        let service = ShopService::new(transport);

        let result = service.adjust_order_line(DOMAIN, TOKEN, "L1", 10).await;

        assert_eq!(
            to_json(&result),
            json!({
                "success": false,
                "errorCode": "INSUFFICIENT_STOCK_ERROR",
                "message": "Only 3 items were added to the order due to insufficient stock",
                "quantityAvailable": 3
            })
        );
    }

    #[tokio::test]
    async fn remove_line_transport_failure_becomes_message() {
        let transport = ScriptedTransport::new()
            .fail("RemoveOrderLine", GraphqlError::Timeout)
            .shared();
        let service = ShopService::new(transport);

        let result = service.remove_order_line(DOMAIN, TOKEN, "L1").await;

        assert_eq!(
            to_json(&result),
            json!({ "success": false, "message": "Request timeout. Please try again." })
        );
    }

    #[tokio::test]
    async fn null_mutation_result_uses_fallback_message() {
        let transport = ScriptedTransport::new()
            .respond("AddItemToOrder", json!({ "addItemToOrder": null }))
            .shared();
        let service = ShopService::new(transport);

        let result = service.add_item_to_cart(DOMAIN, TOKEN, "11", 1).await;

        assert_eq!(
            result.message.as_deref(),
            Some("Failed to add item to order. Check variant ID or quantity.")
        );
    }
}
