use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Graph error: {0}")]
    Graph(#[from] GraphError),

    #[error("Action error: {0}")]
    Action(#[from] ActionError),

    #[error("Workflow not found: {0}")]
    WorkflowNotFound(uuid::Uuid),

    #[error("Execution error: {0}")]
    Execution(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Structural problems in a workflow definition. A run touched by one of
/// these fails before any node executes.
#[derive(Error, Debug, Clone)]
pub enum GraphError {
    #[error("Duplicate node id: {0}")]
    DuplicateNodeId(String),

    #[error("Edge '{edge}' references missing node '{node}'")]
    DanglingEdge { edge: String, node: String },

    #[error("Workflow has no start nodes")]
    NoStartNodes,

    #[error("Node not found: {0}")]
    NodeNotFound(String),
}

/// Failures raised while executing a single node. Every variant is
/// recorded as a failed `NodeExecutionResult` and halts only that branch.
#[derive(Error, Debug, Clone)]
pub enum ActionError {
    #[error("Missing required input: {0}")]
    MissingParam(String),

    #[error("Invalid input '{field}': expected {expected}, got {actual}")]
    InvalidParam {
        field: String,
        expected: String,
        actual: String,
    },

    #[error("Action failed: {0}")]
    Failed(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Cancelled")]
    Cancelled,
}
