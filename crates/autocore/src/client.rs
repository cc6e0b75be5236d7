use crate::error::ActionError;
use crate::node::NodeKind;
use crate::value::Value;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One resolved action, ready to cross the execution boundary
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionRequest {
    pub node_id: String,
    pub kind: NodeKind,
    pub params: HashMap<String, Value>,
    pub timeout_ms: u64,
}

impl ActionRequest {
    pub fn new(kind: NodeKind, node_id: impl Into<String>) -> Self {
        Self {
            node_id: node_id.into(),
            kind,
            params: HashMap::new(),
            timeout_ms: 5_000,
        }
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    pub fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }
}

/// Uniform response shape from the action boundary: a success flag, an
/// optional error message, and the kind-specific fields flattened in
/// (`pageTitle`, `conditionMet`, `extractedValue`, ...)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(flatten)]
    pub fields: HashMap<String, Value>,
}

impl ActionResponse {
    pub fn succeeded() -> Self {
        Self {
            success: true,
            error: None,
            fields: HashMap::new(),
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            fields: HashMap::new(),
        }
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// A kind-specific field, `Null` when the boundary omitted it
    pub fn field(&self, name: &str) -> Value {
        self.fields.get(name).cloned().unwrap_or(Value::Null)
    }

    pub fn bool_field(&self, name: &str) -> Option<bool> {
        self.fields.get(name).and_then(Value::as_bool)
    }

    /// Convert a `success:false` body into an `ActionError::Failed`
    pub fn ok(&self) -> Result<(), ActionError> {
        if self.success {
            Ok(())
        } else {
            Err(ActionError::Failed(
                self.error
                    .clone()
                    .unwrap_or_else(|| "action failed".to_string()),
            ))
        }
    }
}

/// The execution boundary: performs the literal browser interaction for
/// one resolved action and returns the structured result. Transport and
/// serialization failures surface as `ActionError::Transport`.
#[async_trait]
pub trait ActionClient: Send + Sync {
    async fn perform(&self, request: ActionRequest) -> Result<ActionResponse, ActionError>;
}
