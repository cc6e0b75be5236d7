use crate::error::ActionError;
use crate::events::EventEmitter;
use crate::value::{Value, ValueKind};
use crate::vars::ExecutionContext;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// The closed set of browser action kinds the dispatcher understands.
/// A node whose `type` string is not one of these fails at dispatch time
/// with a descriptive error, never a crash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NodeKind {
    OpenUrl,
    Click,
    Input,
    Submit,
    Wait,
    Condition,
    Loop,
    Extract,
    Variable,
}

impl NodeKind {
    pub const ALL: [NodeKind; 9] = [
        NodeKind::OpenUrl,
        NodeKind::Click,
        NodeKind::Input,
        NodeKind::Submit,
        NodeKind::Wait,
        NodeKind::Condition,
        NodeKind::Loop,
        NodeKind::Extract,
        NodeKind::Variable,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::OpenUrl => "openUrl",
            NodeKind::Click => "click",
            NodeKind::Input => "input",
            NodeKind::Submit => "submit",
            NodeKind::Wait => "wait",
            NodeKind::Condition => "condition",
            NodeKind::Loop => "loop",
            NodeKind::Extract => "extract",
            NodeKind::Variable => "variable",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|kind| kind.as_str() == tag)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Core trait implemented by every browser action handler
#[async_trait]
pub trait NodeHandler: Send + Sync {
    /// Which member of the closed kind set this handler serves
    fn kind(&self) -> NodeKind;

    /// Execute one node with resolved inputs
    async fn execute(&self, ctx: &mut HandlerContext<'_>) -> Result<NodeOutput, ActionError>;

    /// Optional: describe the handler's input/output contract
    fn metadata(&self) -> HandlerMetadata {
        HandlerMetadata::default()
    }
}

/// Per-node execution context passed to a handler: the node's resolved
/// parameters, mutable access to the run's variable store, and an event
/// emitter for real-time updates
pub struct HandlerContext<'a> {
    pub node_id: &'a str,
    pub params: HashMap<String, Value>,
    pub vars: &'a mut ExecutionContext,
    pub events: EventEmitter,
}

impl<'a> HandlerContext<'a> {
    /// Get a required input or return an error
    pub fn require_param(&self, name: &str) -> Result<&Value, ActionError> {
        self.params
            .get(name)
            .ok_or_else(|| ActionError::MissingParam(name.to_string()))
    }

    /// Get a required string input
    pub fn require_str(&self, name: &str) -> Result<&str, ActionError> {
        let value = self.require_param(name)?;
        value.as_str().ok_or_else(|| ActionError::InvalidParam {
            field: name.to_string(),
            expected: "text".to_string(),
            actual: ValueKind::of(value).as_str().to_string(),
        })
    }

    /// Get a required string input restricted to a set of accepted values
    pub fn require_one_of(&self, name: &str, accepted: &[&str]) -> Result<String, ActionError> {
        let value = self.require_str(name)?;
        if accepted.contains(&value) {
            Ok(value.to_string())
        } else {
            Err(ActionError::InvalidParam {
                field: name.to_string(),
                expected: format!("one of {}", accepted.join("|")),
                actual: value.to_string(),
            })
        }
    }

    pub fn str_or(&self, name: &str, default: &str) -> String {
        self.params
            .get(name)
            .and_then(Value::as_str)
            .unwrap_or(default)
            .to_string()
    }

    pub fn bool_or(&self, name: &str, default: bool) -> bool {
        self.params
            .get(name)
            .and_then(Value::as_bool)
            .unwrap_or(default)
    }

    pub fn number_or(&self, name: &str, default: f64) -> f64 {
        self.params
            .get(name)
            .and_then(Value::as_f64)
            .unwrap_or(default)
    }

    /// The node's `timeout` input in milliseconds, falling back to the
    /// kind's default
    pub fn timeout_or(&self, default: u64) -> u64 {
        self.number_or("timeout", default as f64) as u64
    }
}

/// Output slots produced by a successful node execution
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NodeOutput {
    pub outputs: HashMap<String, Value>,
}

impl NodeOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_output(mut self, slot: impl Into<String>, value: impl Into<Value>) -> Self {
        self.outputs.insert(slot.into(), value.into());
        self
    }
}

/// Recorded outcome of one node, immutable once stored in the per-run
/// results map
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeExecutionResult {
    pub success: bool,
    #[serde(default)]
    pub outputs: HashMap<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl NodeExecutionResult {
    pub fn completed(outputs: HashMap<String, Value>) -> Self {
        Self {
            success: true,
            outputs,
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            outputs: HashMap::new(),
            error: Some(error.into()),
        }
    }

    /// The boolean `success` output slot, when present.
    /// Drives `true`/`false` edge selection for condition nodes.
    pub fn branch_outcome(&self) -> Option<bool> {
        self.outputs.get("success").and_then(Value::as_bool)
    }
}

/// Metadata about a node kind's contract
#[derive(Debug, Clone)]
pub struct HandlerMetadata {
    pub description: String,
    pub category: String,
    pub inputs: Vec<PortDefinition>,
    pub outputs: Vec<PortDefinition>,
}

impl Default for HandlerMetadata {
    fn default() -> Self {
        Self {
            description: String::new(),
            category: "general".to_string(),
            inputs: Vec::new(),
            outputs: Vec::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PortDefinition {
    pub name: String,
    pub description: String,
    pub required: bool,
}

impl PortDefinition {
    pub fn required(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            required: true,
        }
    }

    pub fn optional(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            required: false,
        }
    }
}
