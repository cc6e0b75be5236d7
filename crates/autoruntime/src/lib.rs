//! Workflow execution runtime
//!
//! This crate provides the handler registry that dispatches nodes to
//! their browser action handlers, the worklist scheduler that walks the
//! graph, and a runtime facade tying them together.

mod executor;
mod registry;
mod runtime;

pub use executor::{RunResult, WorkflowExecutor};
pub use registry::HandlerRegistry;
pub use runtime::{Runtime, RuntimeConfig};
