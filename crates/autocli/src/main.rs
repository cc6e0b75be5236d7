use anyhow::Result;
use autocore::{ExecutionEvent, Graph, NodeEvent, Value, WorkflowDefinition};
use autonodes::HttpActionClient;
use autoruntime::{HandlerRegistry, Runtime, RuntimeConfig};
use clap::{Parser, Subcommand};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "autoflow")]
#[command(about = "Browser automation workflow CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Execute a workflow file against a live action endpoint
    Run {
        /// Path to workflow JSON file
        #[arg(short, long)]
        file: PathBuf,

        /// Seed variable as name=value (value parsed as JSON, else text)
        #[arg(long = "var")]
        vars: Vec<String>,

        /// Action endpoint base URL
        #[arg(short, long, env = "ACTION_ENDPOINT", default_value = "http://127.0.0.1:7700")]
        endpoint: String,

        /// Show verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Validate a workflow file
    Validate {
        /// Path to workflow JSON file
        file: PathBuf,
    },

    /// List available node kinds
    Nodes,

    /// Create a new example workflow
    Init {
        /// Output file path
        #[arg(short, long, default_value = "workflow.json")]
        output: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            file,
            vars,
            endpoint,
            verbose,
        } => {
            if verbose {
                tracing_subscriber::fmt()
                    .with_max_level(tracing::Level::DEBUG)
                    .init();
            } else {
                tracing_subscriber::fmt()
                    .with_max_level(tracing::Level::WARN)
                    .init();
            }

            run_workflow(file, vars, endpoint).await?;
        }

        Commands::Validate { file } => {
            validate_workflow(file)?;
        }

        Commands::Nodes => {
            list_nodes();
        }

        Commands::Init { output } => {
            create_example_workflow(output)?;
        }
    }

    Ok(())
}

/// Parse a `name=value` seed variable; the value is tried as JSON first
/// so arrays and numbers come through typed
fn parse_var(spec: &str) -> Result<(String, Value)> {
    let (name, raw) = spec
        .split_once('=')
        .ok_or_else(|| anyhow::anyhow!("--var must be name=value, got '{spec}'"))?;

    let value = match serde_json::from_str::<serde_json::Value>(raw) {
        Ok(json) => Value::from(json),
        Err(_) => Value::String(raw.to_string()),
    };

    Ok((name.to_string(), value))
}

fn build_registry(endpoint: &str) -> HandlerRegistry {
    let mut registry = HandlerRegistry::new();
    autonodes::register_all(&mut registry, Arc::new(HttpActionClient::new(endpoint)));
    registry
}

async fn run_workflow(file: PathBuf, vars: Vec<String>, endpoint: String) -> Result<()> {
    println!("🚀 Loading workflow from: {}", file.display());

    let workflow_json = std::fs::read_to_string(&file)?;
    let workflow: WorkflowDefinition = serde_json::from_str(&workflow_json)?;

    println!("📋 Workflow: {}", workflow.name);
    println!("   Nodes: {}", workflow.nodes.len());
    println!("   Edges: {}", workflow.edges.len());
    println!();

    let seed: HashMap<String, Value> = vars
        .iter()
        .map(|spec| parse_var(spec))
        .collect::<Result<_>>()?;

    let runtime = Runtime::with_registry(
        Arc::new(build_registry(&endpoint)),
        RuntimeConfig::default(),
    );

    // Subscribe to events for real-time output
    let mut events = runtime.subscribe_events();

    let event_task = tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            match event {
                ExecutionEvent::RunStarted { .. } => {
                    println!("▶️  Run started");
                }
                ExecutionEvent::NodeStarted {
                    node_id, node_type, ..
                } => {
                    println!("  ⚡ Starting node: {} ({})", node_id, node_type);
                }
                ExecutionEvent::NodeCompleted {
                    node_id,
                    duration_ms,
                    ..
                } => {
                    println!("  ✅ Node {} completed in {}ms", node_id, duration_ms);
                }
                ExecutionEvent::NodeFailed { node_id, error, .. } => {
                    println!("  ❌ Node {} failed: {}", node_id, error);
                }
                ExecutionEvent::NodeEvent { node_id, event, .. } => match event {
                    NodeEvent::Info { message } => {
                        println!("     ℹ️  [{}] {}", node_id, message);
                    }
                    NodeEvent::Warning { message } => {
                        println!("     ⚠️  [{}] {}", node_id, message);
                    }
                    NodeEvent::Progress { percent, message } => {
                        if let Some(msg) = message {
                            println!("     📊 [{}] {}% - {}", node_id, percent, msg);
                        } else {
                            println!("     📊 [{}] {}%", node_id, percent);
                        }
                    }
                },
                ExecutionEvent::RunCompleted {
                    success,
                    duration_ms,
                    ..
                } => {
                    if success {
                        println!("✨ Run completed successfully in {}ms", duration_ms);
                    } else {
                        println!("💥 Run failed after {}ms", duration_ms);
                    }
                }
            }
        }
    });

    let result = runtime.execute(&workflow, seed).await;

    // Wait for events to finish printing
    tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;
    event_task.abort();

    println!();
    println!("📊 Run Summary:");
    println!("   Execution ID: {}", result.execution_id);
    println!("   Nodes executed: {}", result.results.len());
    if let Some(error) = &result.error {
        println!("   Error: {}", error);
    }

    if !result.results.is_empty() {
        println!();
        println!("📤 Node results:");
        let mut node_ids: Vec<_> = result.results.keys().collect();
        node_ids.sort();
        for node_id in node_ids {
            let node_result = &result.results[node_id];
            if node_result.success {
                println!("   {} ✅", node_id);
                for (slot, value) in &node_result.outputs {
                    println!("     {}: {}", slot, value);
                }
            } else {
                println!(
                    "   {} ❌ {}",
                    node_id,
                    node_result.error.as_deref().unwrap_or("unknown error")
                );
            }
        }
    }

    if !result.success {
        std::process::exit(1);
    }

    Ok(())
}

fn validate_workflow(file: PathBuf) -> Result<()> {
    println!("🔍 Validating workflow: {}", file.display());

    let workflow_json = std::fs::read_to_string(&file)?;
    let workflow: WorkflowDefinition = serde_json::from_str(&workflow_json)?;

    let graph = Graph::build(&workflow.nodes, &workflow.edges)?;
    let start_nodes: Vec<_> = graph
        .start_nodes()
        .iter()
        .map(|node| node.id.clone())
        .collect();

    println!("✅ Workflow is valid:");
    println!("   Name: {}", workflow.name);
    println!("   Nodes: {}", workflow.nodes.len());
    println!("   Edges: {}", workflow.edges.len());
    if start_nodes.is_empty() {
        println!("   ⚠️  No start nodes — this workflow cannot run");
    } else {
        println!("   Start nodes: {}", start_nodes.join(", "));
    }

    Ok(())
}

fn list_nodes() {
    println!("📦 Available node kinds:");
    println!();

    // The action endpoint is never contacted for a listing
    let registry = build_registry("http://127.0.0.1:7700");

    for kind in registry.kinds() {
        if let Some(metadata) = registry.metadata(kind) {
            println!("  • {} ({})", kind, metadata.category);
            println!("    {}", metadata.description);
            for input in &metadata.inputs {
                let marker = if input.required { "required" } else { "optional" };
                println!("      - {} [{}]: {}", input.name, marker, input.description);
            }
        } else {
            println!("  • {}", kind);
        }
    }
}

fn create_example_workflow(output: PathBuf) -> Result<()> {
    use autocore::{Node, ValueKind};

    let mut workflow = WorkflowDefinition::new("Example scrape workflow");
    workflow.description =
        Some("Opens a page, extracts the heading and branches on a banner check".to_string());

    let open = Node::new("open-page", "openUrl")
        .with_label("Open page")
        .with_param("url", "https://example.com");

    let extract = Node::new("read-heading", "extract")
        .with_label("Read heading")
        .with_param("selector", "h1")
        .with_param("extractType", "text")
        .with_param("variableName", "heading")
        .with_output("extractedValue", ValueKind::Text);

    let check = Node::new("check-banner", "condition")
        .with_label("Banner present?")
        .with_param("selector", ".banner")
        .with_param("condition", "exists");

    let dismiss = Node::new("dismiss-banner", "click")
        .with_label("Dismiss banner")
        .with_param("selector", ".banner .close");

    let log_heading = Node::new("save-heading", "variable")
        .with_label("Save heading")
        .with_param("name", "lastHeading")
        .with_param("value", "${heading}")
        .with_param("scope", "global");

    let open_id = workflow.add_node(open);
    let extract_id = workflow.add_node(extract);
    let check_id = workflow.add_node(check);
    let dismiss_id = workflow.add_node(dismiss);
    let log_id = workflow.add_node(log_heading);

    workflow.connect(open_id, extract_id.clone());
    workflow.connect(extract_id, check_id.clone());
    workflow.connect_handle(check_id.clone(), "true", dismiss_id);
    workflow.connect_handle(check_id, "false", log_id);

    let json = serde_json::to_string_pretty(&workflow)?;
    std::fs::write(&output, json)?;

    println!("✨ Created example workflow: {}", output.display());
    println!();
    println!("Run it with:");
    println!(
        "  autoflow run --file {} --endpoint http://127.0.0.1:7700",
        output.display()
    );

    Ok(())
}
