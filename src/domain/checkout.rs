use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use super::errors::CheckoutError;
use super::order::Order;

/// Input of the checkout action, as submitted by the workflow host.
///
/// Required text fields default to empty so that missing values are reported
/// by validation rather than rejected while decoding.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct CheckoutRequest {
    /// Shop base URL, e.g. `https://your-shop.com`.
    pub vendure_domain: String,
    /// Customer bearer token.
    pub access_token: String,
    pub is_multi_vendor: bool,
    pub first_name: String,
    pub last_name: String,
    pub street_line1: String,
    pub street_line2: Option<String>,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    /// ISO 3166-1 alpha-2, any case.
    pub country_code: String,
    pub phone_number: String,
    /// Company name or landmark.
    pub landmark: Option<String>,
    /// `pickup` or `ship`; multi-vendor only.
    pub delivery_type: Option<String>,
    /// Shipping method ids as strings or numbers; multi-vendor only. Kept
    /// loosely typed so a non-array value is reported by validation.
    #[schema(value_type = Option<Vec<String>>)]
    pub ship_method_ids: Option<Value>,
}

impl CheckoutRequest {
    /// The submitted ids when `shipMethodIds` is an array.
    pub fn ship_method_id_list(&self) -> Option<&[Value]> {
        match &self.ship_method_ids {
            Some(Value::Array(ids)) => Some(ids),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutResult {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<Order>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation_errors: Option<Vec<ValidationError>>,
}

impl CheckoutResult {
    pub fn completed(order: Order) -> Self {
        Self {
            success: true,
            order: Some(order),
            message: None,
            validation_errors: None,
        }
    }
}

impl From<CheckoutError> for CheckoutResult {
    fn from(e: CheckoutError) -> Self {
        let message = Some(e.to_string());
        let validation_errors = match e {
            CheckoutError::Validation(errors) => Some(errors),
            _ => None,
        };
        Self {
            success: false,
            order: None,
            message,
            validation_errors,
        }
    }
}

/// Address sent for both billing and shipping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub full_name: String,
    pub company: String,
    pub street_line1: String,
    pub street_line2: String,
    pub city: String,
    pub province: String,
    pub postal_code: String,
    pub country_code: String,
    pub phone_number: String,
}

impl Address {
    pub fn from_request(request: &CheckoutRequest) -> Self {
        let optional = |value: &Option<String>| {
            value
                .as_deref()
                .map(str::trim)
                .unwrap_or_default()
                .to_string()
        };
        Self {
            full_name: format!(
                "{} {}",
                request.first_name.trim(),
                request.last_name.trim()
            ),
            company: optional(&request.landmark),
            street_line1: request.street_line1.trim().to_string(),
            street_line2: optional(&request.street_line2),
            city: request.city.trim().to_string(),
            province: request.state.trim().to_string(),
            postal_code: request.postal_code.trim().to_string(),
            country_code: request.country_code.to_uppercase(),
            phone_number: request.phone_number.trim().to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryType {
    Pickup,
    Ship,
}

impl DeliveryType {
    /// Case-insensitive, surrounding whitespace ignored.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "pickup" => Some(DeliveryType::Pickup),
            "ship" => Some(DeliveryType::Ship),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DeliveryType::Pickup => "pickup",
            DeliveryType::Ship => "ship",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentMethod {
    ConnectedPayment,
    StandardPayment,
}

impl PaymentMethod {
    pub fn for_vendor_mode(is_multi_vendor: bool) -> Self {
        if is_multi_vendor {
            PaymentMethod::ConnectedPayment
        } else {
            PaymentMethod::StandardPayment
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            PaymentMethod::ConnectedPayment => "connected-payment-method",
            PaymentMethod::StandardPayment => "standard-payment",
        }
    }
}

/// Render a loosely typed id (string or number) as text.
pub fn id_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.trim().to_string()),
        other => Some(other.to_string()),
    }
}

/// Shipping method ids as submitted, minus blanks and stringified nulls.
pub fn sanitize_ship_method_ids(ids: &[Value]) -> Vec<String> {
    ids.iter()
        .filter_map(id_text)
        .filter(|id| !id.is_empty() && id != "null" && id != "undefined")
        .collect()
}
