use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderValue, CONTENT_TYPE};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::domain::errors::GraphqlError;
use crate::domain::ports::{GraphqlReply, GraphqlRequest, GraphqlTransport};

/// Response header carrying the Vendure session token.
pub const AUTH_TOKEN_HEADER: &str = "vendure-auth-token";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_CLIENT_ID: &str = "ActivePieces-Vendure-Checkout/1.0";

// ── Wire format ──────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct WireError {
    message: String,
    #[serde(default)]
    extensions: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    errors: Option<Vec<WireError>>,
}

impl Envelope {
    /// The first reported error wins over any partial data.
    fn into_data(self) -> Result<Value, GraphqlError> {
        if let Some(first) = self.errors.and_then(|errors| errors.into_iter().next()) {
            return Err(GraphqlError::GraphQl {
                message: first.message,
                extensions: first.extensions,
            });
        }
        match self.data {
            Some(data) if !data.is_null() => Ok(data),
            _ => Err(GraphqlError::EmptyResponse),
        }
    }
}

/// A body that is not a GraphQL envelope (an HTML error page, say) carries no
/// data.
fn parse_body(body: &[u8]) -> Result<Value, GraphqlError> {
    let envelope: Envelope =
        serde_json::from_slice(body).map_err(|_| GraphqlError::EmptyResponse)?;
    envelope.into_data()
}

fn classify(e: reqwest::Error) -> GraphqlError {
    if e.is_timeout() {
        GraphqlError::Timeout
    } else if e.is_decode() {
        GraphqlError::Decode(e.to_string())
    } else {
        GraphqlError::Transport(e.to_string())
    }
}

// ── Client ───────────────────────────────────────────────────────────────────

/// `GraphqlTransport` over HTTP POST.
///
/// Statuses below 500 other than 401/403 are read as GraphQL responses, so
/// errors reported in the body surface as `GraphqlError::GraphQl`.
#[derive(Clone)]
pub struct HttpGraphqlClient {
    client: Client,
}

impl HttpGraphqlClient {
    pub fn new(client_id: &str, timeout: Duration) -> Result<Self, GraphqlError> {
        let client = Client::builder()
            .user_agent(client_id)
            .timeout(timeout)
            .build()
            .map_err(classify)?;
        Ok(Self { client })
    }
}

#[async_trait]
impl GraphqlTransport for HttpGraphqlClient {
    async fn execute(&self, request: GraphqlRequest) -> Result<GraphqlReply, GraphqlError> {
        let body = json!({
            "query": request.query.trim(),
            "variables": request.variables,
        });

        let mut builder = self
            .client
            .post(&request.endpoint)
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .json(&body);
        if let Some(token) = &request.bearer_token {
            builder = builder.bearer_auth(token);
        }

        log::debug!("POST {}", request.endpoint);
        let response = builder.send().await.map_err(classify)?;

        let status = response.status();
        match status {
            StatusCode::UNAUTHORIZED => return Err(GraphqlError::Unauthorized),
            StatusCode::FORBIDDEN => return Err(GraphqlError::Forbidden),
            s if s.is_server_error() => {
                return Err(GraphqlError::Transport(format!(
                    "Request failed with status code {}",
                    s.as_u16()
                )))
            }
            _ => {}
        }

        let auth_token = response
            .headers()
            .get(AUTH_TOKEN_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        let body = response.bytes().await.map_err(classify)?;
        let data = parse_body(&body).map_err(|e| {
            log::debug!("{} answered {}: {}", request.endpoint, status, e);
            e
        })?;

        Ok(GraphqlReply { data, auth_token })
    }
}
