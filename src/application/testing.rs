use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;

use super::documents::operation_name;
use crate::domain::errors::GraphqlError;
use crate::domain::ports::{GraphqlReply, GraphqlRequest, GraphqlTransport};

/// Transport that answers by operation name and records every request.
#[derive(Default)]
pub(crate) struct ScriptedTransport {
    replies: Mutex<HashMap<String, Result<Value, GraphqlError>>>,
    calls: Mutex<Vec<GraphqlRequest>>,
    auth_token: Option<String>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, operation: &str, data: Value) -> Self {
        self.replies
            .lock()
            .unwrap()
            .insert(operation.to_string(), Ok(data));
        self
    }

    pub fn fail(self, operation: &str, error: GraphqlError) -> Self {
        self.replies
            .lock()
            .unwrap()
            .insert(operation.to_string(), Err(error));
        self
    }

    pub fn with_auth_token(mut self, token: &str) -> Self {
        self.auth_token = Some(token.to_string());
        self
    }

    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub fn calls(&self) -> Vec<GraphqlRequest> {
        self.calls.lock().unwrap().clone()
    }

    pub fn operations(&self) -> Vec<String> {
        self.calls()
            .iter()
            .map(|c| operation_name(&c.query).unwrap_or("<anonymous>").to_string())
            .collect()
    }

    pub fn call_to(&self, operation: &str) -> Option<GraphqlRequest> {
        self.calls()
            .into_iter()
            .find(|c| operation_name(&c.query) == Some(operation))
    }
}

#[async_trait]
impl GraphqlTransport for ScriptedTransport {
    async fn execute(&self, request: GraphqlRequest) -> Result<GraphqlReply, GraphqlError> {
        let operation = operation_name(&request.query)
            .unwrap_or("<anonymous>")
            .to_string();
        self.calls.lock().unwrap().push(request);
        let reply = self.replies.lock().unwrap().get(&operation).cloned();
        match reply {
            Some(Ok(data)) => Ok(GraphqlReply {
                data,
                auth_token: self.auth_token.clone(),
            }),
            Some(Err(e)) => Err(e),
            None => Err(GraphqlError::Transport(format!(
                "no scripted reply for {}",
                operation
            ))),
        }
    }
}
