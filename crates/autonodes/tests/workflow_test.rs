use async_trait::async_trait;
use autocore::{
    ActionClient, ActionError, ActionRequest, ActionResponse, Node, NodeKind, Value,
    WorkflowDefinition,
};
use autoruntime::{HandlerRegistry, Runtime, RuntimeConfig};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Boundary double for whole-workflow runs: canned responses per node id,
/// plain success for everything else, and a full request log
struct ScriptedBoundary {
    responses: HashMap<String, ActionResponse>,
    requests: Mutex<Vec<ActionRequest>>,
}

impl ScriptedBoundary {
    fn new(responses: HashMap<String, ActionResponse>) -> Arc<Self> {
        Arc::new(Self {
            responses,
            requests: Mutex::new(Vec::new()),
        })
    }

    fn requests_for(&self, node_id: &str) -> Vec<ActionRequest> {
        self.requests
            .lock()
            .expect("boundary lock")
            .iter()
            .filter(|request| request.node_id == node_id)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl ActionClient for ScriptedBoundary {
    async fn perform(&self, request: ActionRequest) -> Result<ActionResponse, ActionError> {
        let response = self
            .responses
            .get(&request.node_id)
            .cloned()
            .unwrap_or_else(ActionResponse::succeeded);
        self.requests.lock().expect("boundary lock").push(request);
        Ok(response)
    }
}

fn runtime_with(boundary: Arc<ScriptedBoundary>) -> Runtime {
    let mut registry = HandlerRegistry::new();
    autonodes::register_all(&mut registry, boundary);
    Runtime::with_registry(Arc::new(registry), RuntimeConfig::default())
}

#[tokio::test]
async fn condition_scenario_follows_only_the_true_branch() {
    // openUrl(A) → condition(B) →[true] extract(C), →[false] click(D)
    let mut workflow = WorkflowDefinition::new("branching scrape");
    workflow.add_node(
        Node::new("A", "openUrl")
            .with_label("Open page")
            .with_param("url", "https://example.com"),
    );
    workflow.add_node(
        Node::new("B", "condition")
            .with_label("Banner present?")
            .with_param("selector", ".banner")
            .with_param("condition", "exists"),
    );
    workflow.add_node(
        Node::new("C", "extract")
            .with_label("Read banner")
            .with_param("selector", ".banner")
            .with_param("extractType", "text")
            .with_param("variableName", "banner"),
    );
    workflow.add_node(
        Node::new("D", "click")
            .with_label("Never reached")
            .with_param("selector", "#noop"),
    );
    workflow.connect("A", "B");
    workflow.connect_handle("B", "true", "C");
    workflow.connect_handle("B", "false", "D");

    let mut responses = HashMap::new();
    responses.insert(
        "A".to_string(),
        ActionResponse::succeeded()
            .with_field("pageTitle", "Example Domain")
            .with_field("pageUrl", "https://example.com/"),
    );
    responses.insert(
        "B".to_string(),
        ActionResponse::succeeded().with_field("conditionMet", true),
    );
    responses.insert(
        "C".to_string(),
        ActionResponse::succeeded().with_field("extractedValue", "Season sale"),
    );
    let boundary = ScriptedBoundary::new(responses);

    let result = runtime_with(boundary.clone())
        .execute(&workflow, HashMap::new())
        .await;

    assert!(result.success);
    assert_eq!(result.results.len(), 3);
    assert!(result.results.contains_key("A"));
    assert!(result.results.contains_key("B"));
    assert!(result.results.contains_key("C"));
    assert!(!result.results.contains_key("D"));
    assert!(boundary.requests_for("D").is_empty(), "D is never invoked");

    assert_eq!(
        result.results["B"].outputs.get("success"),
        Some(&Value::Bool(true))
    );
    assert_eq!(
        result.results["C"].outputs.get("extractedValue"),
        Some(&Value::String("Season sale".to_string()))
    );
}

#[tokio::test]
async fn bound_variable_resolves_into_later_requests() {
    // variable(set) binds a selector, click(use) references it
    let mut workflow = WorkflowDefinition::new("variable passing");
    workflow.add_node(
        Node::new("set", "variable")
            .with_param("name", "target")
            .with_param("value", "#submit-button")
            .with_param("scope", "local"),
    );
    workflow.add_node(Node::new("use", "click").with_param("selector", "${target}"));
    workflow.connect("set", "use");

    let boundary = ScriptedBoundary::new(HashMap::new());
    let result = runtime_with(boundary.clone())
        .execute(&workflow, HashMap::new())
        .await;

    assert!(result.success);

    let click_requests = boundary.requests_for("use");
    assert_eq!(click_requests.len(), 1);
    assert_eq!(
        click_requests[0].params.get("selector"),
        Some(&Value::String("#submit-button".to_string())),
        "the reference must be resolved before crossing the boundary"
    );
}

#[tokio::test]
async fn extracted_array_survives_into_for_each_items() {
    let mut workflow = WorkflowDefinition::new("list iteration");
    workflow.add_node(
        Node::new("scrape", "extract")
            .with_param("selector", ".row")
            .with_param("extractType", "list")
            .with_param("variableName", "rows"),
    );
    workflow.add_node(
        Node::new("each", "loop")
            .with_param("selector", ".row")
            .with_param("condition", "forEach")
            .with_param("items", "${rows}"),
    );
    workflow.connect("scrape", "each");

    let rows = Value::Array(vec!["first".into(), "second".into()]);
    let mut responses = HashMap::new();
    responses.insert(
        "scrape".to_string(),
        ActionResponse::succeeded().with_field("extractedValue", rows.clone()),
    );
    responses.insert(
        "each".to_string(),
        ActionResponse::succeeded()
            .with_field("currentItem", "second")
            .with_field("index", 1.0)
            .with_field("completed", true),
    );
    let boundary = ScriptedBoundary::new(responses);

    let result = runtime_with(boundary.clone())
        .execute(&workflow, HashMap::new())
        .await;

    assert!(result.success);

    let loop_requests = boundary.requests_for("each");
    assert_eq!(loop_requests.len(), 1);
    assert_eq!(
        loop_requests[0].params.get("items"),
        Some(&rows),
        "typed passthrough must deliver the array itself, not its string form"
    );
    assert_eq!(
        result.results["each"].outputs.get("completed"),
        Some(&Value::Bool(true))
    );
}

#[tokio::test]
async fn boundary_failure_is_recorded_without_aborting_the_run() {
    let mut workflow = WorkflowDefinition::new("partial failure");
    workflow.add_node(
        Node::new("broken", "click").with_param("selector", "#gone"),
    );
    workflow.add_node(
        Node::new("after", "click").with_param("selector", "#next"),
    );
    workflow.add_node(
        Node::new("other", "openUrl").with_param("url", "https://example.com"),
    );
    workflow.connect("broken", "after");

    let mut responses = HashMap::new();
    responses.insert(
        "broken".to_string(),
        ActionResponse::failed("element #gone not found"),
    );
    let boundary = ScriptedBoundary::new(responses);

    let result = runtime_with(boundary.clone())
        .execute(&workflow, HashMap::new())
        .await;

    assert!(!result.success);
    assert!(result.error.is_none());
    assert_eq!(
        result.results["broken"].error.as_deref(),
        Some("Action failed: element #gone not found")
    );
    assert!(!result.results.contains_key("after"));
    assert!(result.results["other"].success);
}
