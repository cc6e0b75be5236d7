//! Browser action handler library
//!
//! One handler per member of the closed node kind set, plus the HTTP
//! client that carries resolved actions across the execution boundary.

mod client;
mod control;
mod data;
mod interact;
mod navigate;
mod wait;

pub use client::HttpActionClient;
pub use control::{ConditionHandler, LoopHandler};
pub use data::{ExtractHandler, VariableHandler};
pub use interact::{ClickHandler, InputHandler, SubmitHandler};
pub use navigate::OpenUrlHandler;
pub use wait::WaitHandler;

use autocore::ActionClient;
use autoruntime::HandlerRegistry;
use std::sync::Arc;

/// Register every browser action handler against one action client
pub fn register_all(registry: &mut HandlerRegistry, client: Arc<dyn ActionClient>) {
    registry.register(Arc::new(OpenUrlHandler::new(client.clone())));
    registry.register(Arc::new(ClickHandler::new(client.clone())));
    registry.register(Arc::new(InputHandler::new(client.clone())));
    registry.register(Arc::new(SubmitHandler::new(client.clone())));
    registry.register(Arc::new(WaitHandler::new(client.clone())));
    registry.register(Arc::new(ConditionHandler::new(client.clone())));
    registry.register(Arc::new(LoopHandler::new(client.clone())));
    registry.register(Arc::new(ExtractHandler::new(client.clone())));
    registry.register(Arc::new(VariableHandler::new(client)));
}
