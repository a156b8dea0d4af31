use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use super::errors::GraphqlError;

/// One GraphQL operation against a Vendure endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphqlRequest {
    pub endpoint: String,
    pub bearer_token: Option<String>,
    pub query: String,
    pub variables: Value,
}

impl GraphqlRequest {
    pub fn new(endpoint: impl Into<String>, query: &str) -> Self {
        Self {
            endpoint: endpoint.into(),
            bearer_token: None,
            query: query.to_string(),
            variables: json!({}),
        }
    }

    pub fn bearer(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }

    pub fn variables(mut self, variables: Value) -> Self {
        self.variables = variables;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GraphqlReply {
    /// The response's `data` object.
    pub data: Value,
    /// Session token from the `vendure-auth-token` header, if the server set one.
    pub auth_token: Option<String>,
}

impl GraphqlReply {
    pub fn new(data: Value) -> Self {
        Self {
            data,
            auth_token: None,
        }
    }
}

#[async_trait]
pub trait GraphqlTransport: Send + Sync + 'static {
    async fn execute(&self, request: GraphqlRequest) -> Result<GraphqlReply, GraphqlError>;
}

#[async_trait]
impl<T: GraphqlTransport + ?Sized> GraphqlTransport for Arc<T> {
    async fn execute(&self, request: GraphqlRequest) -> Result<GraphqlReply, GraphqlError> {
        (**self).execute(request).await
    }
}

pub type SharedTransport = Arc<dyn GraphqlTransport>;
