use async_trait::async_trait;
use autocore::{ActionClient, ActionError, ActionRequest, ActionResponse};
use std::time::Duration;

/// HTTP implementation of the action boundary.
///
/// Each action is one `POST {base}/actions/{kind}` with the request as a
/// JSON body and the node's timeout applied to the whole round trip. A
/// non-2xx status or any transport failure becomes
/// [`ActionError::Transport`]; interpreting the response body is left to
/// the handlers.
pub struct HttpActionClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpActionClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl ActionClient for HttpActionClient {
    async fn perform(&self, request: ActionRequest) -> Result<ActionResponse, ActionError> {
        let url = format!(
            "{}/actions/{}",
            self.base_url.trim_end_matches('/'),
            request.kind
        );

        let response = self
            .client
            .post(&url)
            .timeout(Duration::from_millis(request.timeout_ms))
            .json(&request)
            .send()
            .await
            .map_err(|e| ActionError::Transport(format!("action request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ActionError::Transport(format!(
                "action endpoint returned {status}: {body}"
            )));
        }

        response
            .json::<ActionResponse>()
            .await
            .map_err(|e| ActionError::Transport(format!("invalid action response: {e}")))
    }
}
