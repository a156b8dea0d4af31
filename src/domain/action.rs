use serde::Serialize;

use super::errors::GraphqlError;
use super::order::ErrorResult;

/// Result shape shared by the single-request shop actions.
///
/// Exactly one of `data`, `error` or `message` is populated. `data` and
/// `error` are flattened so the payload keys sit next to `success`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActionResult<T> {
    pub success: bool,
    #[serde(flatten)]
    pub data: Option<T>,
    #[serde(flatten)]
    pub error: Option<ErrorResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ActionResult<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            message: None,
        }
    }

    pub fn rejected(error: ErrorResult) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error),
            message: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: None,
            message: Some(message.into()),
        }
    }
}

impl<T> From<GraphqlError> for ActionResult<T> {
    fn from(e: GraphqlError) -> Self {
        ActionResult::failed(e.to_string())
    }
}
