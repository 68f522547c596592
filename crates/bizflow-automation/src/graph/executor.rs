use std::time::Instant;

use serde_json::Value;
use tracing::{debug, info, warn};

use bizflow_core::workflow::{WorkflowConnection, WorkflowNode, WorkflowOutcome};

use super::context::ExecutionContext;
use crate::nodes::NodeDispatcher;

const NO_TRIGGER: &str = "No trigger node found";

/// Identity a run executes on behalf of.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunScope<'a> {
    /// Executing user; becomes `created_by` on created tasks.
    pub user_id: Option<&'a str>,
    /// Space of the automation; default space for created tasks.
    pub space_id: Option<&'a str>,
}

impl<'a> RunScope<'a> {
    pub fn new(user_id: Option<&'a str>, space_id: Option<&'a str>) -> Self {
        Self { user_id, space_id }
    }
}

/// Walks an automation graph once, dispatching each node to its handler.
pub struct WorkflowExecutor {
    dispatcher: NodeDispatcher,
}

impl WorkflowExecutor {
    pub fn new(dispatcher: NodeDispatcher) -> Self {
        Self { dispatcher }
    }

    /// Execute a workflow against a trigger payload.
    ///
    /// The only workflow-level failure is a graph without a trigger node.
    /// Everything else, including failing nodes, completes with
    /// `success: true` and the failure recorded in the node's output.
    pub async fn execute_workflow(
        &self,
        nodes: &[WorkflowNode],
        connections: &[WorkflowConnection],
        trigger_data: &Value,
        scope: RunScope<'_>,
    ) -> WorkflowOutcome {
        let start = Instant::now();

        let mut ordered: Vec<&WorkflowNode> = nodes.iter().collect();
        ordered.sort_by_key(|n| n.order_index);

        let Some(trigger) = ordered.iter().copied().find(|n| n.is_trigger()) else {
            warn!(nodes = nodes.len(), "Workflow has no trigger node");
            return WorkflowOutcome::fatal(NO_TRIGGER);
        };

        info!(
            trigger = %trigger.id,
            nodes = nodes.len(),
            connections = connections.len(),
            "Executing workflow"
        );

        let mut ctx = ExecutionContext::new();
        let output = self
            .dispatcher
            .execute_node(trigger, trigger_data, scope)
            .await;
        ctx.record(&trigger.id, output);

        for node in ordered {
            if node.is_trigger() || ctx.is_executed(&node.id) {
                continue;
            }

            let incoming: Vec<&WorkflowConnection> = connections
                .iter()
                .filter(|c| c.target_node_id == node.id)
                .collect();

            if let Some(pending) = incoming.iter().find(|c| !ctx.is_executed(&c.source_node_id)) {
                debug!(
                    node_id = %node.id,
                    waiting_on = %pending.source_node_id,
                    "Upstream node has not run, skipping"
                );
                continue;
            }

            if let Some(blocked) = incoming.iter().find(|c| !c.permits()) {
                debug!(
                    node_id = %node.id,
                    from = %blocked.source_node_id,
                    "Connection condition not met, skipping"
                );
                continue;
            }

            let input = incoming
                .first()
                .and_then(|c| ctx.input_from(&c.source_node_id))
                .unwrap_or_else(|| trigger_data.clone());

            let output = self.dispatcher.execute_node(node, &input, scope).await;
            ctx.record(&node.id, output);
        }

        let results = ctx.into_results();
        info!(
            executed = results.len(),
            failed = results.iter().filter(|r| !r.output.success).count(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Workflow complete"
        );
        WorkflowOutcome::completed(results)
    }
}
