use actix_cors::Cors;
use actix_web::{
    get, post, web, App, HttpResponse, HttpServer, Responder, Result as ActixResult,
};
use actix_ws::Message;
use autocore::{Value, WorkflowDefinition, WorkflowId};
use autonodes::HttpActionClient;
use autoruntime::{HandlerRegistry, Runtime, RuntimeConfig};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{error, info};
use uuid::Uuid;

/// Application state shared across handlers
struct AppState {
    runtime: Arc<Runtime>,
}

/// Request body for workflow execution
#[derive(Debug, Default, Deserialize)]
struct ExecuteRequest {
    /// Seed variables, available to `${name}` references from the first node
    #[serde(default)]
    variables: HashMap<String, serde_json::Value>,
}

/// Response for workflow creation
#[derive(Debug, Serialize)]
struct WorkflowResponse {
    id: Uuid,
    message: String,
}

/// Error response
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

/// Health check endpoint
#[get("/health")]
async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "autoflow"
    }))
}

/// List all registered workflows
#[get("/api/workflows")]
async fn list_workflows(data: web::Data<AppState>) -> ActixResult<impl Responder> {
    let workflows = data.runtime.list_workflows().await;
    let workflow_list: Vec<_> = workflows
        .iter()
        .map(|w| {
            serde_json::json!({
                "id": w.id,
                "name": w.name,
                "description": w.description,
                "nodes": w.nodes.len(),
                "edges": w.edges.len(),
            })
        })
        .collect();

    Ok(HttpResponse::Ok().json(workflow_list))
}

/// Register a new workflow definition
#[post("/api/workflows")]
async fn create_workflow(
    data: web::Data<AppState>,
    workflow: web::Json<WorkflowDefinition>,
) -> ActixResult<impl Responder> {
    let workflow = workflow.into_inner();

    info!("Registering workflow: {} ({})", workflow.name, workflow.id);

    let id = data.runtime.register_workflow(workflow).await;

    Ok(HttpResponse::Created().json(WorkflowResponse {
        id,
        message: "Workflow registered successfully".to_string(),
    }))
}

/// Get a specific workflow
#[get("/api/workflows/{id}")]
async fn get_workflow(
    data: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> ActixResult<impl Responder> {
    let workflow_id: WorkflowId = path.into_inner();

    match data.runtime.workflow(workflow_id).await {
        Some(workflow) => Ok(HttpResponse::Ok().json(workflow)),
        None => Ok(HttpResponse::NotFound().json(ErrorResponse {
            error: format!("Workflow {} not found", workflow_id),
        })),
    }
}

/// Delete a workflow
#[actix_web::delete("/api/workflows/{id}")]
async fn delete_workflow(
    data: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> ActixResult<impl Responder> {
    let workflow_id: WorkflowId = path.into_inner();

    if data.runtime.remove_workflow(workflow_id).await {
        info!("Deleted workflow: {}", workflow_id);
        Ok(HttpResponse::Ok().json(serde_json::json!({
            "message": "Workflow deleted successfully"
        })))
    } else {
        Ok(HttpResponse::NotFound().json(ErrorResponse {
            error: format!("Workflow {} not found", workflow_id),
        }))
    }
}

/// Execute a workflow and return the full per-node result map
#[post("/api/workflows/{id}/execute")]
async fn execute_workflow(
    data: web::Data<AppState>,
    path: web::Path<Uuid>,
    req: Option<web::Json<ExecuteRequest>>,
) -> ActixResult<impl Responder> {
    let workflow_id: WorkflowId = path.into_inner();
    let request = req.map(web::Json::into_inner).unwrap_or_default();

    info!("Executing workflow: {}", workflow_id);

    let seed: HashMap<String, Value> = request
        .variables
        .into_iter()
        .map(|(k, v)| (k, Value::from(v)))
        .collect();

    match data.runtime.execute_workflow(workflow_id, seed).await {
        Ok(result) => {
            info!(
                "Workflow {} finished: success={} nodes={}",
                workflow_id,
                result.success,
                result.results.len()
            );
            Ok(HttpResponse::Ok().json(result))
        }
        Err(e) => {
            error!("Workflow {} execution failed: {}", workflow_id, e);
            Ok(HttpResponse::NotFound().json(ErrorResponse {
                error: e.to_string(),
            }))
        }
    }
}

/// WebSocket endpoint for real-time execution events
#[get("/api/events")]
async fn websocket_events(
    req: actix_web::HttpRequest,
    stream: web::Payload,
    data: web::Data<AppState>,
) -> ActixResult<HttpResponse> {
    let (res, mut session, mut msg_stream) = actix_ws::handle(&req, stream)?;

    info!("WebSocket client connected");

    let mut events = data.runtime.subscribe_events();

    actix_web::rt::spawn(async move {
        loop {
            tokio::select! {
                event = events.recv() => {
                    match event {
                        Ok(event) => {
                            if let Ok(json) = serde_json::to_string(&event) {
                                if session.text(json).await.is_err() {
                                    break;
                                }
                            }
                        }
                        Err(_) => break,
                    }
                }

                Some(Ok(msg)) = msg_stream.recv() => {
                    match msg {
                        Message::Ping(bytes) => {
                            if session.pong(&bytes).await.is_err() {
                                break;
                            }
                        }
                        Message::Close(_) => break,
                        _ => {}
                    }
                }

                else => break,
            }
        }

        info!("WebSocket client disconnected");
        let _ = session.close(None).await;
    });

    Ok(res)
}

/// List the closed set of node kinds with their contracts
#[get("/api/nodes")]
async fn list_node_kinds(data: web::Data<AppState>) -> ActixResult<impl Responder> {
    let registry = data.runtime.registry();

    let nodes: Vec<_> = registry
        .kinds()
        .iter()
        .map(|kind| {
            let metadata = registry.metadata(*kind);
            serde_json::json!({
                "type": kind.as_str(),
                "description": metadata.as_ref().map(|m| m.description.clone()).unwrap_or_default(),
                "category": metadata.as_ref().map(|m| m.category.clone()).unwrap_or_default(),
            })
        })
        .collect();

    Ok(HttpResponse::Ok().json(nodes))
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    info!("🚀 Starting autoflow server");

    let action_endpoint =
        std::env::var("ACTION_ENDPOINT").unwrap_or_else(|_| "http://127.0.0.1:7700".to_string());

    let mut registry = HandlerRegistry::new();
    autonodes::register_all(&mut registry, Arc::new(HttpActionClient::new(&action_endpoint)));

    let runtime = Runtime::with_registry(Arc::new(registry), RuntimeConfig::default());

    info!("✅ Runtime initialized, action endpoint: {}", action_endpoint);

    let app_state = web::Data::new(AppState {
        runtime: Arc::new(runtime),
    });

    let bind_address = std::env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:3000".to_string());

    info!("🌐 Server starting on http://{}", bind_address);

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .max_age(3600);

        App::new()
            .app_data(app_state.clone())
            .wrap(cors)
            .wrap(actix_web::middleware::Logger::default())
            .service(health_check)
            .service(list_workflows)
            .service(create_workflow)
            .service(get_workflow)
            .service(delete_workflow)
            .service(execute_workflow)
            .service(websocket_events)
            .service(list_node_kinds)
    })
    .bind(&bind_address)?
    .run()
    .await?;

    Ok(())
}
