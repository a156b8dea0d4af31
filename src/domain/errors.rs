use std::fmt;

use serde_json::Value;
use thiserror::Error;

use super::checkout::ValidationError;
use super::order::ErrorResult;

/// Failure of a single call through the GraphQL transport.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GraphqlError {
    #[error("GraphQL Error: {message}{}", extensions_suffix(.extensions))]
    GraphQl {
        message: String,
        extensions: Option<Value>,
    },
    #[error("No data returned from GraphQL query")]
    EmptyResponse,
    #[error("Authentication failed. Please check your access token.")]
    Unauthorized,
    #[error("Authorization failed. Insufficient permissions.")]
    Forbidden,
    #[error("Request timeout. Please try again.")]
    Timeout,
    #[error("Unexpected response shape: {0}")]
    Decode(String),
    #[error("{0}")]
    Transport(String),
}

fn extensions_suffix(extensions: &Option<Value>) -> String {
    match extensions {
        Some(ext) if !ext.is_null() => format!(" ({})", ext),
        _ => String::new(),
    }
}

impl From<serde_json::Error> for GraphqlError {
    fn from(e: serde_json::Error) -> Self {
        GraphqlError::Decode(e.to_string())
    }
}

/// The checkout saga steps that talk to the remote API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutStep {
    ShippingLookup,
    ShippingMethod,
    DeliveryType,
    BillingAddress,
    ShippingAddress,
    StateTransition,
    Payment,
}

impl fmt::Display for CheckoutStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            CheckoutStep::ShippingLookup => "Eligible shipping method lookup",
            CheckoutStep::ShippingMethod => "Shipping method setup",
            CheckoutStep::DeliveryType => "Delivery type setup",
            CheckoutStep::BillingAddress => "Billing address setup",
            CheckoutStep::ShippingAddress => "Shipping address setup",
            CheckoutStep::StateTransition => "Order state transition",
            CheckoutStep::Payment => "Payment processing",
        };
        f.write_str(label)
    }
}

/// Why a saga step failed: the remote returned a business error, or the call
/// itself did not go through.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StepFailure {
    #[error("{} ({})", .0.message, .0.error_code)]
    Remote(ErrorResult),
    #[error(transparent)]
    Transport(#[from] GraphqlError),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CheckoutError {
    #[error("Validation failed")]
    Validation(Vec<ValidationError>),
    #[error("No eligible shipping methods available for this order")]
    NoEligibleShippingMethods,
    #[error("{step} failed: {cause}")]
    Step {
        step: CheckoutStep,
        cause: StepFailure,
    },
}

impl CheckoutError {
    pub fn at(step: CheckoutStep, cause: impl Into<StepFailure>) -> Self {
        CheckoutError::Step {
            step,
            cause: cause.into(),
        }
    }

    pub fn rejected(step: CheckoutStep, error: ErrorResult) -> Self {
        CheckoutError::Step {
            step,
            cause: StepFailure::Remote(error),
        }
    }

    pub fn step(&self) -> Option<CheckoutStep> {
        match self {
            CheckoutError::Step { step, .. } => Some(*step),
            _ => None,
        }
    }
}
