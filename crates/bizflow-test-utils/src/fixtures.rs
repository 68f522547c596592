//! Ready-made graphs and automations.

use serde_json::json;

use bizflow_core::types::Automation;
use bizflow_core::workflow::{WorkflowConnection, WorkflowNode};

/// Node of an unrecognised subtype; executes as a pass-through.
pub fn passthrough(id: &str, order_index: i64) -> WorkflowNode {
    WorkflowNode::action(id, "noop").with_order(order_index)
}

/// `trigger(0) -> b(1) -> c(2)` with unconditional connections.
pub fn linear_chain() -> (Vec<WorkflowNode>, Vec<WorkflowConnection>) {
    (
        vec![
            WorkflowNode::trigger("a"),
            passthrough("b", 1),
            passthrough("c", 2),
        ],
        vec![
            WorkflowConnection::new("a", "b"),
            WorkflowConnection::new("b", "c"),
        ],
    )
}

/// An active automation owned by `owner`, in `space`, sending one notification email.
pub fn notify_automation(id: &str, owner: &str, space: &str) -> Automation {
    let nodes = vec![
        WorkflowNode::trigger("trigger"),
        WorkflowNode::action("email", "send_email")
            .with_order(1)
            .with_config(json!({ "subject": "New lead", "type": "notification" })),
    ];
    let connections = vec![WorkflowConnection::new("trigger", "email")];
    Automation::new(id, "Lead notification", owner)
        .with_space(space)
        .with_graph(nodes, connections)
}
