//! A fake Vendure server for the integration tests.
//!
//! Each GraphQL operation name maps to a canned `(status, body)` reply.
//! Every call is recorded so tests can assert on order and headers.

#![allow(dead_code)]

use std::collections::HashMap;
use std::net::TcpListener;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use actix_web::http::StatusCode;
use actix_web::{web, App, HttpRequest, HttpResponse, HttpServer};
use serde_json::{json, Value};
use vendure_actions::application::documents::operation_name;

pub const SESSION_TOKEN: &str = "session-abc";

#[derive(Debug, Clone)]
pub struct Seen {
    pub path: String,
    pub operation: String,
    pub authorization: Option<String>,
    pub user_agent: Option<String>,
    pub variables: Value,
}

#[derive(Debug, Clone)]
struct Reply {
    status: u16,
    content_type: &'static str,
    body: String,
}

#[derive(Clone, Default)]
pub struct FakeVendure {
    replies: HashMap<String, Reply>,
    delay: Duration,
    seen: Arc<Mutex<Vec<Seen>>>,
}

impl FakeVendure {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `operation` with HTTP 200 and `{"data": data}`.
    pub fn data(self, operation: &str, data: Value) -> Self {
        self.reply(operation, 200, json!({ "data": data }))
    }

    pub fn reply(self, operation: &str, status: u16, body: Value) -> Self {
        self.raw(operation, status, "application/json", &body.to_string())
    }

    /// Answer `operation` with an arbitrary body, e.g. an HTML error page.
    pub fn raw(mut self, operation: &str, status: u16, content_type: &'static str, body: &str) -> Self {
        self.replies.insert(
            operation.to_string(),
            Reply {
                status,
                content_type,
                body: body.to_string(),
            },
        );
        self
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn seen(&self) -> Vec<Seen> {
        self.seen.lock().unwrap().clone()
    }

    pub fn operations(&self) -> Vec<String> {
        self.seen().into_iter().map(|s| s.operation).collect()
    }

    /// Bind port 0, spawn the server and return its base URL.
    pub fn start(&self) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind fake Vendure");
        let port = listener.local_addr().unwrap().port();
        let data = web::Data::new(self.clone());
        let server = HttpServer::new(move || {
            App::new()
                .app_data(data.clone())
                .route("/shop-api", web::post().to(graphql))
                .route("/admin-api", web::post().to(graphql))
        })
        .workers(1)
        .listen(listener)
        .expect("Failed to listen")
        .run();
        tokio::spawn(server);
        format!("http://127.0.0.1:{}", port)
    }
}

fn header(req: &HttpRequest, name: &str) -> Option<String> {
    req.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
}

async fn graphql(
    state: web::Data<FakeVendure>,
    req: HttpRequest,
    body: web::Json<Value>,
) -> HttpResponse {
    let query = body["query"].as_str().unwrap_or_default();
    let operation = operation_name(query).unwrap_or_default().to_string();
    state.seen.lock().unwrap().push(Seen {
        path: req.path().to_string(),
        operation: operation.clone(),
        authorization: header(&req, "authorization"),
        user_agent: header(&req, "user-agent"),
        variables: body["variables"].clone(),
    });

    if !state.delay.is_zero() {
        tokio::time::sleep(state.delay).await;
    }

    match state.replies.get(&operation) {
        Some(reply) => HttpResponse::build(StatusCode::from_u16(reply.status).unwrap())
            .insert_header(("vendure-auth-token", SESSION_TOKEN))
            .content_type(reply.content_type)
            .body(reply.body.clone()),
        None => HttpResponse::Ok().json(json!({
            "errors": [{ "message": format!("unexpected operation {}", operation) }]
        })),
    }
}

/// Replies for a successful single-vendor checkout.
pub fn checkout_happy_path() -> FakeVendure {
    FakeVendure::new()
        .data(
            "EligibleShippingMethods",
            json!({ "eligibleShippingMethods": [
                { "id": "3", "name": "Standard", "price": 500 },
                { "id": "4", "name": "Express", "price": 1500 }
            ]}),
        )
        .data("SetShipping", json!({ "setOrderShippingMethod": { "id": "7" } }))
        .data("SetBilling", json!({ "setOrderBillingAddress": { "id": "7" } }))
        .data(
            "SetShippingAddress",
            json!({ "setOrderShippingAddress": { "id": "7" } }),
        )
        .data(
            "TransitionToArrangingPayment",
            json!({ "transitionOrderToState": { "id": "7", "state": "ArrangingPayment" } }),
        )
        .data(
            "AddPayment",
            json!({ "addPaymentToOrder": {
                "id": "7",
                "code": "K3M9",
                "state": "PaymentAuthorized",
                "totalWithTax": 2599
            }}),
        )
}

/// A checkout body that passes validation against `domain`.
pub fn checkout_body(domain: &str) -> Value {
    json!({
        "vendureDomain": domain,
        "accessToken": "cust-token-0123456789",
        "isMultiVendor": false,
        "firstName": "Ada",
        "lastName": "Lovelace",
        "streetLine1": "12 St James Square",
        "city": "London",
        "state": "Westminster",
        "postalCode": "SW1Y 4JH",
        "countryCode": "gb",
        "phoneNumber": "+44 20 7946 0958"
    })
}
