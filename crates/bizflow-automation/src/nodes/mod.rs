//! Node handlers, one per `NodeSubtype`.
//!
//! Every handler reports its own failures as `NodeOutput::failed`; nothing
//! here returns an error to the executor.

pub mod delay;
pub mod email;
pub mod task;
pub mod webhook;

use std::sync::Arc;
use std::time::Instant;

use serde_json::{Map, Value};
use tracing::{debug, warn};

use bizflow_core::resolve::Layers;
use bizflow_core::traits::{EmailSender, TaskCreator};
use bizflow_core::workflow::{NodeOutput, NodeSubtype, WorkflowNode};

use crate::graph::RunScope;

/// Routes a node to the handler for its subtype.
pub struct NodeDispatcher {
    email: Arc<dyn EmailSender>,
    tasks: Arc<dyn TaskCreator>,
    http: reqwest::Client,
}

impl NodeDispatcher {
    pub fn new(
        email: Arc<dyn EmailSender>,
        tasks: Arc<dyn TaskCreator>,
        http: reqwest::Client,
    ) -> Self {
        Self { email, tasks, http }
    }

    /// Execute a single node against its input.
    pub async fn execute_node(
        &self,
        node: &WorkflowNode,
        input: &Value,
        scope: RunScope<'_>,
    ) -> NodeOutput {
        let start = Instant::now();
        let output = match &node.node_subtype {
            NodeSubtype::SendEmail => email::send_email(self.email.as_ref(), &node.config, input).await,
            NodeSubtype::CreateTask => {
                task::create_task(self.tasks.as_ref(), &node.config, input, scope).await
            }
            NodeSubtype::WebhookCall => webhook::call_webhook(&self.http, &node.config, input).await,
            NodeSubtype::Delay => delay::delay(&node.config).await,
            NodeSubtype::Unknown(_) => NodeOutput::ok().with("data", input.clone()),
        };

        let elapsed_ms = start.elapsed().as_millis() as u64;
        match &output.error {
            None => debug!(
                node_id = %node.id,
                subtype = node.node_subtype.as_str(),
                elapsed_ms,
                "Node executed"
            ),
            Some(error) => warn!(
                node_id = %node.id,
                subtype = node.node_subtype.as_str(),
                elapsed_ms,
                error = %error,
                "Node failed"
            ),
        }
        output
    }
}

/// Field sources for a handler, highest precedence first: the node config,
/// the nested payload object `input[nested]`, the flat input, and finally the
/// `data` payload a pass-through upstream node wraps its input in.
pub(crate) fn layers<'a>(
    config: &'a Map<String, Value>,
    input: &'a Value,
    nested: &str,
) -> Layers<'a> {
    Layers::new()
        .push(config)
        .push_value(input.get(nested))
        .push_value(Some(input))
        .push_value(input.get("data"))
}
