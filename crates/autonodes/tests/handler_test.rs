use async_trait::async_trait;
use autocore::{
    ActionClient, ActionError, ActionRequest, ActionResponse, EventBus, ExecutionContext,
    ExecutionId, HandlerContext, NodeHandler, Value,
};
use autonodes::{
    ClickHandler, ConditionHandler, ExtractHandler, LoopHandler, OpenUrlHandler, VariableHandler,
    WaitHandler,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Action boundary double: returns a canned response and records every
/// request it sees
struct MockClient {
    response: ActionResponse,
    requests: Mutex<Vec<ActionRequest>>,
}

impl MockClient {
    fn returning(response: ActionResponse) -> Arc<Self> {
        Arc::new(Self {
            response,
            requests: Mutex::new(Vec::new()),
        })
    }

    fn ok() -> Arc<Self> {
        Self::returning(ActionResponse::succeeded())
    }

    fn last_request(&self) -> ActionRequest {
        self.requests
            .lock()
            .expect("mock lock")
            .last()
            .cloned()
            .expect("a request should have been sent")
    }

    fn request_count(&self) -> usize {
        self.requests.lock().expect("mock lock").len()
    }
}

#[async_trait]
impl ActionClient for MockClient {
    async fn perform(&self, request: ActionRequest) -> Result<ActionResponse, ActionError> {
        self.requests.lock().expect("mock lock").push(request);
        Ok(self.response.clone())
    }
}

fn params(entries: &[(&str, Value)]) -> HashMap<String, Value> {
    entries
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

fn context<'a>(
    vars: &'a mut ExecutionContext,
    params: HashMap<String, Value>,
    bus: &EventBus,
) -> HandlerContext<'a> {
    HandlerContext {
        node_id: "n1",
        params,
        vars,
        events: bus.create_emitter(ExecutionId::new_v4(), "n1".to_string()),
    }
}

#[tokio::test]
async fn open_url_applies_defaults_and_maps_page_fields() {
    let client = MockClient::returning(
        ActionResponse::succeeded()
            .with_field("pageTitle", "Example Domain")
            .with_field("pageUrl", "https://example.com/"),
    );
    let handler = OpenUrlHandler::new(client.clone());
    let bus = EventBus::new(16);
    let mut vars = ExecutionContext::new();

    let mut ctx = context(
        &mut vars,
        params(&[("url", "https://example.com".into())]),
        &bus,
    );
    let output = handler.execute(&mut ctx).await.expect("openUrl should succeed");

    let request = client.last_request();
    assert_eq!(request.timeout_ms, 30_000);
    assert_eq!(request.params.get("waitForLoad"), Some(&Value::Bool(true)));

    assert_eq!(output.outputs.get("success"), Some(&Value::Bool(true)));
    assert_eq!(
        output.outputs.get("pageTitle"),
        Some(&Value::String("Example Domain".to_string()))
    );
    assert_eq!(
        output.outputs.get("pageUrl"),
        Some(&Value::String("https://example.com/".to_string()))
    );
}

#[tokio::test]
async fn open_url_requires_url() {
    let client = MockClient::ok();
    let handler = OpenUrlHandler::new(client.clone());
    let bus = EventBus::new(16);
    let mut vars = ExecutionContext::new();

    let mut ctx = context(&mut vars, HashMap::new(), &bus);
    let error = handler.execute(&mut ctx).await.expect_err("url is required");

    assert!(matches!(error, ActionError::MissingParam(name) if name == "url"));
    assert_eq!(client.request_count(), 0, "no request crosses the boundary");
}

#[tokio::test]
async fn click_fills_button_and_count_defaults() {
    let client = MockClient::ok();
    let handler = ClickHandler::new(client.clone());
    let bus = EventBus::new(16);
    let mut vars = ExecutionContext::new();

    let mut ctx = context(&mut vars, params(&[("selector", "#go".into())]), &bus);
    handler.execute(&mut ctx).await.expect("click should succeed");

    let request = client.last_request();
    assert_eq!(
        request.params.get("button"),
        Some(&Value::String("left".to_string()))
    );
    assert_eq!(request.params.get("clickCount"), Some(&Value::Number(1.0)));
    assert_eq!(request.timeout_ms, 5_000);
}

#[tokio::test]
async fn failed_response_body_becomes_action_failure() {
    let client = MockClient::returning(ActionResponse::failed("element not found"));
    let handler = ClickHandler::new(client);
    let bus = EventBus::new(16);
    let mut vars = ExecutionContext::new();

    let mut ctx = context(&mut vars, params(&[("selector", "#gone".into())]), &bus);
    let error = handler.execute(&mut ctx).await.expect_err("must surface failure");

    assert!(matches!(error, ActionError::Failed(msg) if msg == "element not found"));
}

#[tokio::test]
async fn wait_rejects_unknown_condition() {
    let client = MockClient::ok();
    let handler = WaitHandler::new(client.clone());
    let bus = EventBus::new(16);
    let mut vars = ExecutionContext::new();

    let mut ctx = context(&mut vars, params(&[("condition", "moonPhase".into())]), &bus);
    let error = handler.execute(&mut ctx).await.expect_err("condition set is closed");

    assert!(matches!(error, ActionError::InvalidParam { field, .. } if field == "condition"));
    assert_eq!(client.request_count(), 0);
}

#[tokio::test]
async fn condition_maps_condition_met_into_success_output() {
    for met in [true, false] {
        let client = MockClient::returning(
            ActionResponse::succeeded().with_field("conditionMet", met),
        );
        let handler = ConditionHandler::new(client);
        let bus = EventBus::new(16);
        let mut vars = ExecutionContext::new();

        let mut ctx = context(
            &mut vars,
            params(&[("selector", ".banner".into()), ("condition", "exists".into())]),
            &bus,
        );
        let output = handler
            .execute(&mut ctx)
            .await
            .expect("a false outcome is still a successful execution");

        assert_eq!(output.outputs.get("success"), Some(&Value::Bool(met)));
    }
}

#[tokio::test]
async fn extract_binds_value_to_configured_variable() {
    let client = MockClient::returning(
        ActionResponse::succeeded().with_field("extractedValue", "Welcome"),
    );
    let handler = ExtractHandler::new(client);
    let bus = EventBus::new(16);
    let mut vars = ExecutionContext::new();

    let mut ctx = context(
        &mut vars,
        params(&[
            ("selector", "h1".into()),
            ("extractType", "text".into()),
            ("variableName", "heading".into()),
        ]),
        &bus,
    );
    let output = handler.execute(&mut ctx).await.expect("extract should succeed");

    assert_eq!(
        output.outputs.get("extractedValue"),
        Some(&Value::String("Welcome".to_string()))
    );

    let var = vars.get("heading").expect("variable must be written");
    assert_eq!(var.value, Value::String("Welcome".to_string()));
    assert_eq!(var.source_node_id, "n1");
    assert_eq!(var.output_key, "extractedValue");
}

#[tokio::test]
async fn extract_without_variable_name_leaves_store_untouched() {
    let client = MockClient::returning(
        ActionResponse::succeeded().with_field("extractedValue", "Welcome"),
    );
    let handler = ExtractHandler::new(client);
    let bus = EventBus::new(16);
    let mut vars = ExecutionContext::new();

    let mut ctx = context(
        &mut vars,
        params(&[("selector", "h1".into()), ("extractType", "text".into())]),
        &bus,
    );
    handler.execute(&mut ctx).await.expect("extract should succeed");

    assert!(vars.is_empty());
}

#[tokio::test]
async fn variable_writes_store_and_echoes_value() {
    let client = MockClient::ok();
    let handler = VariableHandler::new(client);
    let bus = EventBus::new(16);
    let mut vars = ExecutionContext::new();

    let mut ctx = context(
        &mut vars,
        params(&[
            ("name", "counter".into()),
            ("value", Value::Number(3.0)),
            ("scope", "local".into()),
        ]),
        &bus,
    );
    let output = handler.execute(&mut ctx).await.expect("variable should succeed");

    assert_eq!(output.outputs.get("value"), Some(&Value::Number(3.0)));
    assert_eq!(
        vars.get("counter").map(|v| v.value.clone()),
        Some(Value::Number(3.0))
    );
}

#[tokio::test]
async fn variable_requires_scope() {
    let client = MockClient::ok();
    let handler = VariableHandler::new(client);
    let bus = EventBus::new(16);
    let mut vars = ExecutionContext::new();

    let mut ctx = context(
        &mut vars,
        params(&[("name", "counter".into()), ("value", Value::Number(3.0))]),
        &bus,
    );
    let error = handler.execute(&mut ctx).await.expect_err("scope is required");

    assert!(matches!(error, ActionError::MissingParam(name) if name == "scope"));
    assert!(vars.is_empty());
}

#[tokio::test]
async fn loop_for_each_requires_an_array() {
    let client = MockClient::ok();
    let handler = LoopHandler::new(client.clone());
    let bus = EventBus::new(16);
    let mut vars = ExecutionContext::new();

    let mut ctx = context(
        &mut vars,
        params(&[
            ("selector", ".row".into()),
            ("condition", "forEach".into()),
            ("items", "not-an-array".into()),
        ]),
        &bus,
    );
    let error = handler.execute(&mut ctx).await.expect_err("items must be an array");

    assert!(matches!(
        error,
        ActionError::InvalidParam { field, expected, .. }
            if field == "items" && expected == "array"
    ));
    assert_eq!(client.request_count(), 0);
}

#[tokio::test]
async fn loop_ships_items_and_maps_iteration_outputs() {
    let client = MockClient::returning(
        ActionResponse::succeeded()
            .with_field("currentItem", "beta")
            .with_field("index", 1.0)
            .with_field("completed", true),
    );
    let handler = LoopHandler::new(client.clone());
    let bus = EventBus::new(16);
    let mut vars = ExecutionContext::new();

    let items = Value::Array(vec!["alpha".into(), "beta".into()]);
    let mut ctx = context(
        &mut vars,
        params(&[
            ("selector", ".row".into()),
            ("condition", "forEach".into()),
            ("items", items.clone()),
        ]),
        &bus,
    );
    let output = handler.execute(&mut ctx).await.expect("loop should succeed");

    let request = client.last_request();
    assert_eq!(request.params.get("items"), Some(&items));
    assert_eq!(
        request.params.get("maxIterations"),
        Some(&Value::Number(10.0))
    );

    assert_eq!(
        output.outputs.get("currentItem"),
        Some(&Value::String("beta".to_string()))
    );
    assert_eq!(output.outputs.get("index"), Some(&Value::Number(1.0)));
    assert_eq!(output.outputs.get("completed"), Some(&Value::Bool(true)));
}
