use async_trait::async_trait;
use autocore::{
    ActionClient, ActionError, ActionRequest, HandlerContext, HandlerMetadata, NodeHandler,
    NodeKind, NodeOutput, PortDefinition,
};
use std::sync::Arc;

/// Navigate the page to a URL
pub struct OpenUrlHandler {
    client: Arc<dyn ActionClient>,
}

impl OpenUrlHandler {
    pub fn new(client: Arc<dyn ActionClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl NodeHandler for OpenUrlHandler {
    fn kind(&self) -> NodeKind {
        NodeKind::OpenUrl
    }

    async fn execute(&self, ctx: &mut HandlerContext<'_>) -> Result<NodeOutput, ActionError> {
        let url = ctx.require_str("url")?.to_string();
        let wait_for_load = ctx.bool_or("waitForLoad", true);
        let timeout = ctx.timeout_or(30_000);

        ctx.events.info(format!("opening {url}"));

        let request = ActionRequest::new(NodeKind::OpenUrl, ctx.node_id)
            .with_param("url", url)
            .with_param("waitForLoad", wait_for_load)
            .with_timeout(timeout);

        let response = self.client.perform(request).await?;
        response.ok()?;

        Ok(NodeOutput::new()
            .with_output("success", true)
            .with_output("pageTitle", response.field("pageTitle"))
            .with_output("pageUrl", response.field("pageUrl")))
    }

    fn metadata(&self) -> HandlerMetadata {
        HandlerMetadata {
            description: "Navigate the browser to a URL".to_string(),
            category: "navigation".to_string(),
            inputs: vec![
                PortDefinition::required("url", "Address to open"),
                PortDefinition::optional("waitForLoad", "Wait for the load event (default true)"),
                PortDefinition::optional("timeout", "Milliseconds before giving up (default 30000)"),
            ],
            outputs: vec![
                PortDefinition::required("success", "Whether navigation completed"),
                PortDefinition::optional("pageTitle", "Title of the loaded page"),
                PortDefinition::optional("pageUrl", "Final URL after redirects"),
            ],
        }
    }
}
