use async_trait::async_trait;
use autocore::{
    ActionClient, ActionError, ActionRequest, HandlerContext, HandlerMetadata, NodeHandler,
    NodeKind, NodeOutput, PortDefinition, Value, ValueKind,
};
use std::sync::Arc;

/// Probe the page and report a boolean outcome.
///
/// The boundary's `conditionMet` field maps into the `success` output
/// slot, which is what `true`/`false` edge handles branch on. A `false`
/// outcome is still a successful execution of the node.
pub struct ConditionHandler {
    client: Arc<dyn ActionClient>,
}

impl ConditionHandler {
    pub fn new(client: Arc<dyn ActionClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl NodeHandler for ConditionHandler {
    fn kind(&self) -> NodeKind {
        NodeKind::Condition
    }

    async fn execute(&self, ctx: &mut HandlerContext<'_>) -> Result<NodeOutput, ActionError> {
        let selector = ctx.require_str("selector")?.to_string();
        let condition =
            ctx.require_one_of("condition", &["exists", "visible", "text", "attribute"])?;
        let timeout = ctx.timeout_or(5_000);

        let mut request = ActionRequest::new(NodeKind::Condition, ctx.node_id)
            .with_param("selector", selector)
            .with_param("condition", condition)
            .with_timeout(timeout);
        for passthrough in ["value", "attribute"] {
            if let Some(extra) = ctx.params.get(passthrough) {
                request = request.with_param(passthrough, extra.clone());
            }
        }

        let response = self.client.perform(request).await?;
        response.ok()?;

        let met = response.bool_field("conditionMet").unwrap_or(false);
        Ok(NodeOutput::new().with_output("success", met))
    }

    fn metadata(&self) -> HandlerMetadata {
        HandlerMetadata {
            description: "Evaluate a page condition and branch on the outcome".to_string(),
            category: "control".to_string(),
            inputs: vec![
                PortDefinition::required("selector", "CSS selector to probe"),
                PortDefinition::required("condition", "exists | visible | text | attribute"),
                PortDefinition::optional("value", "Expected text for text conditions"),
                PortDefinition::optional("attribute", "Attribute name for attribute conditions"),
                PortDefinition::optional("timeout", "Milliseconds before giving up (default 5000)"),
            ],
            outputs: vec![PortDefinition::required(
                "success",
                "Boolean outcome driving true/false edges",
            )],
        }
    }
}

/// Iterate over matched elements or a bound items array.
///
/// The engine resolves the `items` reference up front and ships the whole
/// array in one call; per-item advancement happens on the other side of
/// the boundary, and the outputs report the aggregate iteration state.
pub struct LoopHandler {
    client: Arc<dyn ActionClient>,
}

impl LoopHandler {
    pub fn new(client: Arc<dyn ActionClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl NodeHandler for LoopHandler {
    fn kind(&self) -> NodeKind {
        NodeKind::Loop
    }

    async fn execute(&self, ctx: &mut HandlerContext<'_>) -> Result<NodeOutput, ActionError> {
        let selector = ctx.require_str("selector")?.to_string();
        let condition = ctx.require_one_of("condition", &["while", "forEach"])?;
        let max_iterations = ctx.number_or("maxIterations", 10.0);
        let timeout = ctx.timeout_or(5_000);

        let mut request = ActionRequest::new(NodeKind::Loop, ctx.node_id)
            .with_param("selector", selector)
            .with_param("condition", condition.clone())
            .with_param("maxIterations", max_iterations)
            .with_timeout(timeout);

        if condition == "forEach" {
            let items = ctx.require_param("items")?;
            if !matches!(items, Value::Array(_)) {
                return Err(ActionError::InvalidParam {
                    field: "items".to_string(),
                    expected: "array".to_string(),
                    actual: ValueKind::of(items).as_str().to_string(),
                });
            }
            request = request.with_param("items", items.clone());
        }

        let response = self.client.perform(request).await?;
        response.ok()?;

        Ok(NodeOutput::new()
            .with_output("currentItem", response.field("currentItem"))
            .with_output("index", response.field("index"))
            .with_output("completed", response.field("completed")))
    }

    fn metadata(&self) -> HandlerMetadata {
        HandlerMetadata {
            description: "Run one aggregate iteration step over elements or items".to_string(),
            category: "control".to_string(),
            inputs: vec![
                PortDefinition::required("selector", "CSS selector scoping the iteration"),
                PortDefinition::required("condition", "while | forEach"),
                PortDefinition::optional("items", "Array reference for forEach"),
                PortDefinition::optional("maxIterations", "Iteration cap (default 10)"),
                PortDefinition::optional("timeout", "Milliseconds before giving up (default 5000)"),
            ],
            outputs: vec![
                PortDefinition::optional("currentItem", "Item the iteration stopped on"),
                PortDefinition::optional("index", "Index the iteration stopped on"),
                PortDefinition::optional("completed", "Whether the iteration ran to the end"),
            ],
        }
    }
}
