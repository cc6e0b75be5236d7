use crate::{HandlerRegistry, RunResult, WorkflowExecutor};
use autocore::{EngineError, EventBus, ExecutionEvent, Value, WorkflowDefinition, WorkflowId};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;

/// Main runtime for executing automation workflows
pub struct Runtime {
    registry: Arc<HandlerRegistry>,
    executor: WorkflowExecutor,
    event_bus: Arc<EventBus>,
    workflows: Arc<RwLock<HashMap<WorkflowId, WorkflowDefinition>>>,
}

impl Runtime {
    /// Create a runtime with a pre-configured handler registry
    pub fn with_registry(registry: Arc<HandlerRegistry>, config: RuntimeConfig) -> Self {
        Self {
            registry,
            executor: WorkflowExecutor::new(),
            event_bus: Arc::new(EventBus::new(config.event_buffer_size)),
            workflows: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Access the handler registry
    pub fn registry(&self) -> &Arc<HandlerRegistry> {
        &self.registry
    }

    /// Register a workflow definition
    pub async fn register_workflow(&self, workflow: WorkflowDefinition) -> WorkflowId {
        let id = workflow.id;
        self.workflows.write().await.insert(id, workflow);
        id
    }

    pub async fn workflow(&self, id: WorkflowId) -> Option<WorkflowDefinition> {
        self.workflows.read().await.get(&id).cloned()
    }

    pub async fn list_workflows(&self) -> Vec<WorkflowDefinition> {
        self.workflows.read().await.values().cloned().collect()
    }

    pub async fn remove_workflow(&self, id: WorkflowId) -> bool {
        self.workflows.write().await.remove(&id).is_some()
    }

    /// Execute a registered workflow by id
    pub async fn execute_workflow(
        &self,
        id: WorkflowId,
        seed: HashMap<String, Value>,
    ) -> Result<RunResult, EngineError> {
        let workflow = self
            .workflow(id)
            .await
            .ok_or(EngineError::WorkflowNotFound(id))?;
        Ok(self.execute(&workflow, seed).await)
    }

    /// Execute a workflow directly, without registration
    pub async fn execute(
        &self,
        workflow: &WorkflowDefinition,
        seed: HashMap<String, Value>,
    ) -> RunResult {
        self.execute_with(workflow, seed, CancellationToken::new())
            .await
    }

    /// Execute with an externally held cancellation token, so the caller
    /// can abort a long run between steps
    pub async fn execute_with(
        &self,
        workflow: &WorkflowDefinition,
        seed: HashMap<String, Value>,
        cancellation: CancellationToken,
    ) -> RunResult {
        self.executor
            .execute(workflow, &self.registry, &self.event_bus, seed, cancellation)
            .await
    }

    /// Subscribe to execution events
    pub fn subscribe_events(&self) -> tokio::sync::broadcast::Receiver<ExecutionEvent> {
        self.event_bus.subscribe()
    }

    /// The event bus, for direct access
    pub fn event_bus(&self) -> &Arc<EventBus> {
        &self.event_bus
    }
}

/// Configuration for the runtime
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub event_buffer_size: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            event_buffer_size: 1000,
        }
    }
}
