use async_trait::async_trait;
use autocore::{
    ActionClient, ActionError, ActionRequest, HandlerContext, HandlerMetadata, NodeHandler,
    NodeKind, NodeOutput, PortDefinition, Value,
};
use std::sync::Arc;

/// Pause until a delay elapses, an element appears, or the network idles
pub struct WaitHandler {
    client: Arc<dyn ActionClient>,
}

impl WaitHandler {
    pub fn new(client: Arc<dyn ActionClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl NodeHandler for WaitHandler {
    fn kind(&self) -> NodeKind {
        NodeKind::Wait
    }

    async fn execute(&self, ctx: &mut HandlerContext<'_>) -> Result<NodeOutput, ActionError> {
        let condition = ctx.require_one_of("condition", &["delay", "element", "networkIdle"])?;
        let delay = ctx.number_or("delay", 1_000.0);
        let timeout = ctx.timeout_or(5_000);

        let mut request = ActionRequest::new(NodeKind::Wait, ctx.node_id)
            .with_param("condition", condition)
            .with_param("delay", delay)
            .with_timeout(timeout);
        if let Some(selector) = ctx.params.get("selector").and_then(Value::as_str) {
            request = request.with_param("selector", selector);
        }

        let response = self.client.perform(request).await?;
        response.ok()?;

        Ok(NodeOutput::new().with_output("success", true))
    }

    fn metadata(&self) -> HandlerMetadata {
        HandlerMetadata {
            description: "Wait for a delay, an element or network idle".to_string(),
            category: "timing".to_string(),
            inputs: vec![
                PortDefinition::required("condition", "delay | element | networkIdle"),
                PortDefinition::optional("delay", "Milliseconds to wait (default 1000)"),
                PortDefinition::optional("selector", "Element to wait for"),
                PortDefinition::optional("timeout", "Milliseconds before giving up (default 5000)"),
            ],
            outputs: vec![PortDefinition::required("success", "Whether the wait finished")],
        }
    }
}
