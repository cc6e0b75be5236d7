use async_trait::async_trait;
use autocore::{
    ActionClient, ActionError, ActionRequest, HandlerContext, HandlerMetadata, NodeHandler,
    NodeKind, NodeOutput, PortDefinition, Value,
};
use std::sync::Arc;

/// Pull a value out of the page and bind it to a run variable
pub struct ExtractHandler {
    client: Arc<dyn ActionClient>,
}

impl ExtractHandler {
    pub fn new(client: Arc<dyn ActionClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl NodeHandler for ExtractHandler {
    fn kind(&self) -> NodeKind {
        NodeKind::Extract
    }

    async fn execute(&self, ctx: &mut HandlerContext<'_>) -> Result<NodeOutput, ActionError> {
        let selector = ctx.require_str("selector")?.to_string();
        let extract_type =
            ctx.require_one_of("extractType", &["text", "attribute", "innerHTML", "list"])?;
        let timeout = ctx.timeout_or(5_000);

        let mut request = ActionRequest::new(NodeKind::Extract, ctx.node_id)
            .with_param("selector", selector)
            .with_param("extractType", extract_type)
            .with_timeout(timeout);
        if let Some(attribute) = ctx.params.get("attribute").and_then(Value::as_str) {
            request = request.with_param("attribute", attribute);
        }

        let response = self.client.perform(request).await?;
        response.ok()?;

        let extracted = response.field("extractedValue");

        if let Some(name) = ctx.params.get("variableName").and_then(Value::as_str) {
            let name = name.to_string();
            ctx.events.info(format!("extracted value bound to {name}"));
            ctx.vars
                .set(&name, extracted.clone(), ctx.node_id, "extractedValue");
        }

        Ok(NodeOutput::new()
            .with_output("extractedValue", extracted)
            .with_output("success", true))
    }

    fn metadata(&self) -> HandlerMetadata {
        HandlerMetadata {
            description: "Extract text, markup or attributes from the page".to_string(),
            category: "data".to_string(),
            inputs: vec![
                PortDefinition::required("selector", "CSS selector to read from"),
                PortDefinition::required("extractType", "text | attribute | innerHTML | list"),
                PortDefinition::optional("attribute", "Attribute name for attribute extraction"),
                PortDefinition::optional("variableName", "Run variable to bind the value to"),
                PortDefinition::optional("timeout", "Milliseconds before giving up (default 5000)"),
            ],
            outputs: vec![
                PortDefinition::required("extractedValue", "The value read from the page"),
                PortDefinition::required("success", "Whether extraction succeeded"),
            ],
        }
    }
}

/// Bind a resolved value to a run variable
pub struct VariableHandler {
    client: Arc<dyn ActionClient>,
}

impl VariableHandler {
    pub fn new(client: Arc<dyn ActionClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl NodeHandler for VariableHandler {
    fn kind(&self) -> NodeKind {
        NodeKind::Variable
    }

    async fn execute(&self, ctx: &mut HandlerContext<'_>) -> Result<NodeOutput, ActionError> {
        let name = ctx.require_str("name")?.to_string();
        let value = ctx.require_param("value")?.clone();
        // The store is one flat namespace; scope is validated and
        // forwarded but does not partition anything.
        let scope = ctx.require_one_of("scope", &["local", "global"])?;

        let request = ActionRequest::new(NodeKind::Variable, ctx.node_id)
            .with_param("name", name.clone())
            .with_param("value", value.clone())
            .with_param("scope", scope);

        let response = self.client.perform(request).await?;
        response.ok()?;

        ctx.vars.set(&name, value.clone(), ctx.node_id, "value");

        Ok(NodeOutput::new().with_output("value", value))
    }

    fn metadata(&self) -> HandlerMetadata {
        HandlerMetadata {
            description: "Assign a value to a run variable".to_string(),
            category: "data".to_string(),
            inputs: vec![
                PortDefinition::required("name", "Variable name"),
                PortDefinition::required("value", "Value to bind, references resolved"),
                PortDefinition::required("scope", "local | global"),
            ],
            outputs: vec![PortDefinition::required("value", "The bound value")],
        }
    }
}
