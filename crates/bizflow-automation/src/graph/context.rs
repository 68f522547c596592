use std::collections::{HashMap, HashSet};

use serde_json::Value;

use bizflow_core::workflow::{NodeOutput, NodeRun};

/// Per-run state of a workflow walk.
///
/// Created fresh for every run and threaded through the walk by value;
/// nothing here outlives a single `execute_workflow` call.
#[derive(Debug, Default)]
pub struct ExecutionContext {
    node_outputs: HashMap<String, NodeOutput>,
    executed: HashSet<String>,
    results: Vec<NodeRun>,
}

impl ExecutionContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a node's output and mark it executed.
    ///
    /// A node is recorded at most once; later records for the same id are ignored.
    pub fn record(&mut self, node_id: &str, output: NodeOutput) {
        if !self.executed.insert(node_id.to_string()) {
            return;
        }
        self.node_outputs.insert(node_id.to_string(), output.clone());
        self.results.push(NodeRun {
            node_id: node_id.to_string(),
            output,
        });
    }

    pub fn is_executed(&self, node_id: &str) -> bool {
        self.executed.contains(node_id)
    }

    pub fn output(&self, node_id: &str) -> Option<&NodeOutput> {
        self.node_outputs.get(node_id)
    }

    /// The output of `node_id` as the JSON input for a downstream node.
    pub fn input_from(&self, node_id: &str) -> Option<Value> {
        self.output(node_id).map(NodeOutput::to_value)
    }

    /// Executed nodes in execution order.
    pub fn into_results(self) -> Vec<NodeRun> {
        self.results
    }
}
