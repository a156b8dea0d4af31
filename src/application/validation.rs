//! Checkout input rules.
//!
//! Every rule is evaluated; the returned list holds one entry per violated
//! field, in a fixed field order. Nothing here performs I/O.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use url::Url;

use crate::domain::checkout::{CheckoutRequest, DeliveryType, ValidationError};

static NAME: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-zA-Z\s]{2,50}$").unwrap());
static POSTAL_CODE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z0-9\s-]{3,12}$").unwrap());
static COUNTRY_CODE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z]{2}$").unwrap());
static PHONE_NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\+?[1-9][0-9]{9,14}$").unwrap());
static PHONE_SEPARATORS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\s\-()]").unwrap());

pub fn is_valid_url(raw: &str) -> bool {
    Url::parse(raw)
        .map(|url| matches!(url.scheme(), "http" | "https"))
        .unwrap_or(false)
}

pub fn is_valid_access_token(token: &str) -> bool {
    token.trim().chars().count() >= 10
}

pub fn is_valid_name(name: &str) -> bool {
    NAME.is_match(name.trim())
}

pub fn is_valid_city_state(value: &str) -> bool {
    NAME.is_match(value.trim())
}

pub fn is_valid_street_line1(line: &str) -> bool {
    (5..=100).contains(&line.trim().chars().count())
}

pub fn is_valid_postal_code(code: &str) -> bool {
    POSTAL_CODE.is_match(code.trim())
}

pub fn is_valid_country_code(code: &str) -> bool {
    COUNTRY_CODE.is_match(&code.to_uppercase())
}

pub fn is_valid_phone_number(phone: &str) -> bool {
    let cleaned = PHONE_SEPARATORS.replace_all(phone, "");
    PHONE_NUMBER.is_match(&cleaned)
}

/// Optional free text: absent, or at most `max` characters once trimmed.
pub fn within_limit(value: Option<&str>, max: usize) -> bool {
    value.map_or(true, |v| v.trim().chars().count() <= max)
}

fn require(errors: &mut Vec<ValidationError>, ok: bool, field: &str, message: &str) {
    if !ok {
        errors.push(ValidationError::new(field, message));
    }
}

pub fn validate(request: &CheckoutRequest) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    require(
        &mut errors,
        is_valid_url(&request.vendure_domain),
        "vendureDomain",
        "Valid domain URL is required (e.g., https://your-shop.com)",
    );
    require(
        &mut errors,
        is_valid_access_token(&request.access_token),
        "accessToken",
        "Valid access token is required (minimum 10 characters)",
    );
    require(
        &mut errors,
        is_valid_name(&request.first_name),
        "firstName",
        "First name must be 2-50 characters, letters only",
    );
    require(
        &mut errors,
        is_valid_name(&request.last_name),
        "lastName",
        "Last name must be 2-50 characters, letters only",
    );
    require(
        &mut errors,
        is_valid_street_line1(&request.street_line1),
        "streetLine1",
        "Street address must be 5-100 characters",
    );
    require(
        &mut errors,
        within_limit(request.street_line2.as_deref(), 100),
        "streetLine2",
        "Street line 2 must not exceed 100 characters",
    );
    require(
        &mut errors,
        is_valid_city_state(&request.city),
        "city",
        "City must be 2-50 characters, letters and spaces only",
    );
    require(
        &mut errors,
        is_valid_city_state(&request.state),
        "state",
        "State must be 2-50 characters, letters and spaces only",
    );
    require(
        &mut errors,
        is_valid_postal_code(&request.postal_code),
        "postalCode",
        "Valid postal code is required",
    );
    require(
        &mut errors,
        is_valid_country_code(&request.country_code),
        "countryCode",
        "Valid 2-letter country code is required (e.g., US, IN, GB)",
    );
    require(
        &mut errors,
        is_valid_phone_number(&request.phone_number),
        "phoneNumber",
        "Valid phone number is required (10-15 digits with optional +)",
    );
    require(
        &mut errors,
        within_limit(request.landmark.as_deref(), 100),
        "landmark",
        "Company/landmark must not exceed 100 characters",
    );

    if request.is_multi_vendor {
        let delivery_ok = match request.delivery_type.as_deref() {
            Some(raw) if !raw.is_empty() => DeliveryType::parse(raw).is_some(),
            _ => true,
        };
        require(
            &mut errors,
            delivery_ok,
            "deliveryType",
            r#"Delivery type must be either "pickup" or "ship""#,
        );
        let ids_ok = match &request.ship_method_ids {
            None => true,
            Some(Value::Array(ids)) => !ids.is_empty(),
            Some(_) => false,
        };
        require(
            &mut errors,
            ids_ok,
            "shipMethodIds",
            "Valid shipping method IDs array is required for multi-vendor checkout",
        );
    }

    errors
}
