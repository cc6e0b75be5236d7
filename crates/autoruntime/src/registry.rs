use autocore::{
    EventEmitter, ExecutionContext, HandlerContext, HandlerMetadata, Node, NodeExecutionResult,
    NodeHandler, NodeKind,
};
use std::collections::HashMap;
use std::sync::Arc;

/// Registry of browser action handlers, keyed by node kind.
///
/// This is the dispatch layer: it parses a node's type tag against the
/// closed kind set, resolves the node's parameters against the run's
/// variables, and invokes the matching handler. Unknown tags and
/// unregistered kinds become failed results, never panics.
pub struct HandlerRegistry {
    handlers: HashMap<NodeKind, Arc<dyn NodeHandler>>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    pub fn register(&mut self, handler: Arc<dyn NodeHandler>) {
        let kind = handler.kind();
        tracing::info!(%kind, "registering node handler");
        self.handlers.insert(kind, handler);
    }

    pub fn get(&self, kind: NodeKind) -> Option<&Arc<dyn NodeHandler>> {
        self.handlers.get(&kind)
    }

    /// All registered kinds
    pub fn kinds(&self) -> Vec<NodeKind> {
        let mut kinds: Vec<_> = self.handlers.keys().copied().collect();
        kinds.sort_by_key(|kind| kind.as_str());
        kinds
    }

    pub fn metadata(&self, kind: NodeKind) -> Option<HandlerMetadata> {
        self.handlers.get(&kind).map(|handler| handler.metadata())
    }

    /// Execute one node: resolve its inputs, route to its handler, and
    /// fold any error into the uniform result shape
    pub async fn dispatch(
        &self,
        node: &Node,
        vars: &mut ExecutionContext,
        events: EventEmitter,
    ) -> NodeExecutionResult {
        let kind = match NodeKind::from_tag(&node.node_type) {
            Some(kind) => kind,
            None => {
                return NodeExecutionResult::failed(format!(
                    "unknown node type: {}",
                    node.node_type
                ));
            }
        };

        let handler = match self.handlers.get(&kind) {
            Some(handler) => handler,
            None => {
                return NodeExecutionResult::failed(format!("no handler registered for {kind}"));
            }
        };

        let params = vars.resolve_map(&node.data.params);
        let mut ctx = HandlerContext {
            node_id: &node.id,
            params,
            vars,
            events,
        };

        match handler.execute(&mut ctx).await {
            Ok(output) => NodeExecutionResult::completed(output.outputs),
            Err(error) => NodeExecutionResult::failed(error.to_string()),
        }
    }
}

impl Default for HandlerRegistry {
    fn default() -> Self {
        Self::new()
    }
}
