use crate::registry::HandlerRegistry;
use autocore::{
    ActionError, EventBus, ExecutionContext, ExecutionEvent, ExecutionId, Graph, GraphError,
    NodeExecutionResult, NodeId, Value, WorkflowDefinition,
};
use chrono::Utc;
use serde::Serialize;
use std::collections::{HashMap, HashSet, VecDeque};
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

/// Walks a workflow graph breadth-first from its start nodes, dispatching
/// one node at a time and aggregating per-node results.
///
/// Reachability is driven purely by successful predecessor completion: a
/// failed node enqueues none of its outgoing edges, so its downstream
/// branch simply never appears in the results map. The run itself keeps
/// going until the worklist drains.
pub struct WorkflowExecutor;

impl WorkflowExecutor {
    pub fn new() -> Self {
        Self
    }

    /// Execute a workflow definition. Never returns an error: structural
    /// problems, per-node failures and cancellation all land in the
    /// returned [`RunResult`].
    pub async fn execute(
        &self,
        workflow: &WorkflowDefinition,
        registry: &HandlerRegistry,
        event_bus: &EventBus,
        seed: HashMap<String, Value>,
        cancellation: CancellationToken,
    ) -> RunResult {
        let execution_id = ExecutionId::new_v4();
        let start_time = Instant::now();

        event_bus.emit(ExecutionEvent::RunStarted {
            execution_id,
            workflow_id: workflow.id,
            timestamp: Utc::now(),
        });

        tracing::info!(workflow = %workflow.id, %execution_id, "starting workflow run");

        let (results, error) = self
            .run(workflow, registry, event_bus, execution_id, seed, cancellation)
            .await;

        let duration_ms = start_time.elapsed().as_millis() as u64;
        let success = error.is_none() && results.values().all(|result| result.success);

        event_bus.emit(ExecutionEvent::RunCompleted {
            execution_id,
            success,
            duration_ms,
            timestamp: Utc::now(),
        });

        RunResult {
            execution_id,
            success,
            results,
            error,
            duration_ms,
        }
    }

    async fn run(
        &self,
        workflow: &WorkflowDefinition,
        registry: &HandlerRegistry,
        event_bus: &EventBus,
        execution_id: ExecutionId,
        seed: HashMap<String, Value>,
        cancellation: CancellationToken,
    ) -> (HashMap<NodeId, NodeExecutionResult>, Option<String>) {
        let mut results = HashMap::new();

        let graph = match Graph::build(&workflow.nodes, &workflow.edges) {
            Ok(graph) => graph,
            Err(error) => {
                tracing::error!(workflow = %workflow.id, %error, "workflow failed validation");
                return (results, Some(error.to_string()));
            }
        };

        let mut queue: VecDeque<NodeId> = graph
            .start_nodes()
            .into_iter()
            .map(|node| node.id.clone())
            .collect();

        if queue.is_empty() {
            tracing::error!(workflow = %workflow.id, "workflow has no start nodes");
            return (results, Some(GraphError::NoStartNodes.to_string()));
        }

        let mut executed: HashSet<NodeId> = HashSet::new();
        let mut vars = ExecutionContext::seeded(seed);

        while let Some(node_id) = queue.pop_front() {
            if cancellation.is_cancelled() {
                return (results, Some(ActionError::Cancelled.to_string()));
            }

            // A node reachable via two paths executes at most once
            if executed.contains(&node_id) {
                continue;
            }

            let node = match graph.node(&node_id) {
                Some(node) => node,
                None => continue,
            };

            event_bus.emit(ExecutionEvent::NodeStarted {
                execution_id,
                node_id: node_id.clone(),
                node_type: node.node_type.clone(),
                timestamp: Utc::now(),
            });

            let emitter = event_bus.create_emitter(execution_id, node_id.clone());
            let node_start = Instant::now();

            let result = tokio::select! {
                _ = cancellation.cancelled() => {
                    NodeExecutionResult::failed(ActionError::Cancelled.to_string())
                }
                result = registry.dispatch(node, &mut vars, emitter) => result,
            };

            let node_duration_ms = node_start.elapsed().as_millis() as u64;

            if result.success {
                tracing::info!(node = %node_id, duration_ms = node_duration_ms, "node completed");

                event_bus.emit(ExecutionEvent::NodeCompleted {
                    execution_id,
                    node_id: node_id.clone(),
                    outputs: result.outputs.clone(),
                    duration_ms: node_duration_ms,
                    timestamp: Utc::now(),
                });

                // Edge selection: `true`/`false` source handles follow the
                // boolean `success` output; everything else always follows.
                let branch = result.branch_outcome();
                for edge in graph.outgoing_edges(&node_id) {
                    let follow = match edge.source_handle.as_deref() {
                        Some("true") => branch == Some(true),
                        Some("false") => branch == Some(false),
                        _ => true,
                    };
                    if follow {
                        queue.push_back(edge.target.clone());
                    }
                }
            } else {
                let error = result.error.clone().unwrap_or_default();
                tracing::warn!(node = %node_id, %error, "node failed, halting its branch");

                event_bus.emit(ExecutionEvent::NodeFailed {
                    execution_id,
                    node_id: node_id.clone(),
                    error,
                    timestamp: Utc::now(),
                });
            }

            executed.insert(node_id.clone());
            results.insert(node_id, result);
        }

        (results, None)
    }
}

impl Default for WorkflowExecutor {
    fn default() -> Self {
        Self::new()
    }
}

/// Aggregate outcome of one workflow run.
///
/// `success` is the AND over every recorded node result; a structural
/// error or cancellation sets `error` and forces failure with whatever
/// results had been recorded up to that point.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunResult {
    pub execution_id: Uuid,
    pub success: bool,
    pub results: HashMap<NodeId, NodeExecutionResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub duration_ms: u64,
}
