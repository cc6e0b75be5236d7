use async_trait::async_trait;
use autocore::{
    ActionClient, ActionError, ActionRequest, HandlerContext, HandlerMetadata, NodeHandler,
    NodeKind, NodeOutput, PortDefinition,
};
use std::sync::Arc;

/// Click an element
pub struct ClickHandler {
    client: Arc<dyn ActionClient>,
}

impl ClickHandler {
    pub fn new(client: Arc<dyn ActionClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl NodeHandler for ClickHandler {
    fn kind(&self) -> NodeKind {
        NodeKind::Click
    }

    async fn execute(&self, ctx: &mut HandlerContext<'_>) -> Result<NodeOutput, ActionError> {
        let selector = ctx.require_str("selector")?.to_string();
        let button = ctx.str_or("button", "left");
        let click_count = ctx.number_or("clickCount", 1.0);
        let timeout = ctx.timeout_or(5_000);

        let request = ActionRequest::new(NodeKind::Click, ctx.node_id)
            .with_param("selector", selector)
            .with_param("button", button)
            .with_param("clickCount", click_count)
            .with_timeout(timeout);

        let response = self.client.perform(request).await?;
        response.ok()?;

        Ok(NodeOutput::new().with_output("success", true))
    }

    fn metadata(&self) -> HandlerMetadata {
        HandlerMetadata {
            description: "Click an element".to_string(),
            category: "interaction".to_string(),
            inputs: vec![
                PortDefinition::required("selector", "CSS selector of the target element"),
                PortDefinition::optional("button", "Mouse button (default left)"),
                PortDefinition::optional("clickCount", "Number of clicks (default 1)"),
                PortDefinition::optional("timeout", "Milliseconds before giving up (default 5000)"),
            ],
            outputs: vec![PortDefinition::required("success", "Whether the click landed")],
        }
    }
}

/// Type text into an input element
pub struct InputHandler {
    client: Arc<dyn ActionClient>,
}

impl InputHandler {
    pub fn new(client: Arc<dyn ActionClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl NodeHandler for InputHandler {
    fn kind(&self) -> NodeKind {
        NodeKind::Input
    }

    async fn execute(&self, ctx: &mut HandlerContext<'_>) -> Result<NodeOutput, ActionError> {
        let selector = ctx.require_str("selector")?.to_string();
        let value = ctx.require_param("value")?.clone();
        let clear_first = ctx.bool_or("clearFirst", true);
        let timeout = ctx.timeout_or(5_000);

        let request = ActionRequest::new(NodeKind::Input, ctx.node_id)
            .with_param("selector", selector)
            .with_param("value", value)
            .with_param("clearFirst", clear_first)
            .with_timeout(timeout);

        let response = self.client.perform(request).await?;
        response.ok()?;

        Ok(NodeOutput::new().with_output("success", true))
    }

    fn metadata(&self) -> HandlerMetadata {
        HandlerMetadata {
            description: "Type a value into an element".to_string(),
            category: "interaction".to_string(),
            inputs: vec![
                PortDefinition::required("selector", "CSS selector of the target element"),
                PortDefinition::required("value", "Text to type"),
                PortDefinition::optional("clearFirst", "Clear the field first (default true)"),
                PortDefinition::optional("timeout", "Milliseconds before giving up (default 5000)"),
            ],
            outputs: vec![PortDefinition::required("success", "Whether the text was entered")],
        }
    }
}

/// Submit a form
pub struct SubmitHandler {
    client: Arc<dyn ActionClient>,
}

impl SubmitHandler {
    pub fn new(client: Arc<dyn ActionClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl NodeHandler for SubmitHandler {
    fn kind(&self) -> NodeKind {
        NodeKind::Submit
    }

    async fn execute(&self, ctx: &mut HandlerContext<'_>) -> Result<NodeOutput, ActionError> {
        let selector = ctx.require_str("selector")?.to_string();
        let wait_for_navigation = ctx.bool_or("waitForNavigation", true);
        let timeout = ctx.timeout_or(5_000);

        let request = ActionRequest::new(NodeKind::Submit, ctx.node_id)
            .with_param("selector", selector)
            .with_param("waitForNavigation", wait_for_navigation)
            .with_timeout(timeout);

        let response = self.client.perform(request).await?;
        response.ok()?;

        Ok(NodeOutput::new().with_output("success", true))
    }

    fn metadata(&self) -> HandlerMetadata {
        HandlerMetadata {
            description: "Submit a form".to_string(),
            category: "interaction".to_string(),
            inputs: vec![
                PortDefinition::required("selector", "CSS selector of the form"),
                PortDefinition::optional(
                    "waitForNavigation",
                    "Wait for the resulting navigation (default true)",
                ),
                PortDefinition::optional("timeout", "Milliseconds before giving up (default 5000)"),
            ],
            outputs: vec![PortDefinition::required("success", "Whether the form submitted")],
        }
    }
}
