//! Core abstractions for the automation flow engine
//!
//! This crate provides the fundamental types and traits that all other
//! components depend on: the workflow graph model, the dynamic value type,
//! the variable store and reference resolver, the node handler and action
//! client contracts, and execution events.

mod client;
mod error;
mod events;
mod graph;
mod node;
pub mod template;
mod value;
mod vars;
mod workflow;

pub use client::{ActionClient, ActionRequest, ActionResponse};
pub use error::{ActionError, EngineError, GraphError};
pub use events::{EventBus, EventEmitter, ExecutionEvent, ExecutionId, NodeEvent};
pub use graph::Graph;
pub use node::{
    HandlerContext, HandlerMetadata, NodeExecutionResult, NodeHandler, NodeKind, NodeOutput,
    PortDefinition,
};
pub use value::{Value, ValueKind};
pub use vars::{ExecutionContext, RuntimeValue};
pub use workflow::{Edge, EdgeKind, Node, NodeData, NodeId, WorkflowDefinition, WorkflowId};

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;
