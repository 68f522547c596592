use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Role of a node within an automation graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NodeKind {
    /// Entry point of the graph; seeded with the trigger payload.
    Trigger,
    Action,
    /// Any other stored node type.
    Other(String),
}

impl NodeKind {
    pub fn as_str(&self) -> &str {
        match self {
            NodeKind::Trigger => "trigger",
            NodeKind::Action => "action",
            NodeKind::Other(s) => s,
        }
    }
}

impl From<String> for NodeKind {
    fn from(s: String) -> Self {
        match s.as_str() {
            "trigger" => NodeKind::Trigger,
            "action" => NodeKind::Action,
            _ => NodeKind::Other(s),
        }
    }
}

impl From<NodeKind> for String {
    fn from(kind: NodeKind) -> Self {
        kind.as_str().to_string()
    }
}

/// Behavior selector for a node.
///
/// Unrecognised subtypes are kept verbatim in `Unknown` so definitions written
/// by newer clients still load; they execute as a pass-through.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NodeSubtype {
    SendEmail,
    CreateTask,
    WebhookCall,
    Delay,
    Unknown(String),
}

impl NodeSubtype {
    pub fn as_str(&self) -> &str {
        match self {
            NodeSubtype::SendEmail => "send_email",
            NodeSubtype::CreateTask => "create_task",
            NodeSubtype::WebhookCall => "webhook_call",
            NodeSubtype::Delay => "delay",
            NodeSubtype::Unknown(s) => s,
        }
    }
}

impl Default for NodeSubtype {
    fn default() -> Self {
        NodeSubtype::Unknown(String::new())
    }
}

impl From<String> for NodeSubtype {
    fn from(s: String) -> Self {
        match s.as_str() {
            "send_email" => NodeSubtype::SendEmail,
            "create_task" => NodeSubtype::CreateTask,
            "webhook_call" => NodeSubtype::WebhookCall,
            "delay" => NodeSubtype::Delay,
            _ => NodeSubtype::Unknown(s),
        }
    }
}

impl From<NodeSubtype> for String {
    fn from(subtype: NodeSubtype) -> Self {
        subtype.as_str().to_string()
    }
}

/// A node in a stored automation graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowNode {
    pub id: String,
    pub node_type: NodeKind,
    #[serde(default)]
    pub node_subtype: NodeSubtype,
    #[serde(default)]
    pub order_index: i64,
    #[serde(default, deserialize_with = "object_or_empty")]
    pub config: Map<String, Value>,
}

impl WorkflowNode {
    /// Create a trigger node.
    pub fn trigger(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            node_type: NodeKind::Trigger,
            node_subtype: NodeSubtype::Unknown("manual".to_string()),
            order_index: 0,
            config: Map::new(),
        }
    }

    /// Create an action node of the given subtype.
    pub fn action(id: impl Into<String>, subtype: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            node_type: NodeKind::Action,
            node_subtype: NodeSubtype::from(subtype.into()),
            order_index: 0,
            config: Map::new(),
        }
    }

    /// Set the sort position.
    pub fn with_order(mut self, order_index: i64) -> Self {
        self.order_index = order_index;
        self
    }

    /// Set the node config. Non-object values are ignored.
    pub fn with_config(mut self, config: Value) -> Self {
        if let Value::Object(map) = config {
            self.config = map;
        }
        self
    }

    pub fn is_trigger(&self) -> bool {
        self.node_type == NodeKind::Trigger
    }
}

/// Gate applied to a connection before its target may run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConditionType {
    /// Target runs only when `condition_config` is truthy.
    If,
    /// Target runs only when `condition_config` is falsy.
    Unless,
    /// Any other stored value; behaves like no condition.
    #[serde(other)]
    Always,
}

/// A directed edge between two nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowConnection {
    pub source_node_id: String,
    pub target_node_id: String,
    #[serde(default)]
    pub condition_type: Option<ConditionType>,
    #[serde(default)]
    pub condition_config: Value,
}

impl WorkflowConnection {
    /// Create an unconditional connection.
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            source_node_id: from.into(),
            target_node_id: to.into(),
            condition_type: None,
            condition_config: Value::Null,
        }
    }

    /// Create an `if` connection.
    pub fn when(from: impl Into<String>, to: impl Into<String>, config: Value) -> Self {
        Self {
            condition_type: Some(ConditionType::If),
            condition_config: config,
            ..Self::new(from, to)
        }
    }

    /// Create an `unless` connection.
    pub fn unless(from: impl Into<String>, to: impl Into<String>, config: Value) -> Self {
        Self {
            condition_type: Some(ConditionType::Unless),
            condition_config: config,
            ..Self::new(from, to)
        }
    }

    /// Whether this connection lets its target run.
    pub fn permits(&self) -> bool {
        match self.condition_type {
            Some(ConditionType::If) => is_truthy(&self.condition_config),
            Some(ConditionType::Unless) => !is_truthy(&self.condition_config),
            Some(ConditionType::Always) | None => true,
        }
    }
}

/// JSON truthiness: `null`, `false`, `0` and `""` are falsy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Output produced by a node handler.
///
/// Node-specific fields are flattened next to `success` and `error`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeOutput {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl NodeOutput {
    pub fn ok() -> Self {
        Self {
            success: true,
            error: None,
            fields: Map::new(),
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            fields: Map::new(),
        }
    }

    /// Attach a node-specific field.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// The JSON object a downstream node receives as its input.
    pub fn to_value(&self) -> Value {
        let mut map = self.fields.clone();
        map.insert("success".to_string(), Value::Bool(self.success));
        if let Some(ref error) = self.error {
            map.insert("error".to_string(), Value::String(error.clone()));
        }
        Value::Object(map)
    }
}

/// One executed node in a run, in execution order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRun {
    #[serde(rename = "nodeId")]
    pub node_id: String,
    pub output: NodeOutput,
}

/// Result of walking an automation graph once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowOutcome {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results: Option<Vec<NodeRun>>,
}

impl WorkflowOutcome {
    pub fn completed(results: Vec<NodeRun>) -> Self {
        Self {
            success: true,
            error: None,
            results: Some(results),
        }
    }

    /// Fatal, workflow-level failure. Carries no partial results.
    pub fn fatal(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            results: None,
        }
    }

    /// Look up the output of an executed node.
    pub fn output_of(&self, node_id: &str) -> Option<&NodeOutput> {
        self.results
            .as_ref()?
            .iter()
            .find(|r| r.node_id == node_id)
            .map(|r| &r.output)
    }

    /// Ids of executed nodes, in execution order.
    pub fn executed_ids(&self) -> Vec<&str> {
        self.results
            .iter()
            .flatten()
            .map(|r| r.node_id.as_str())
            .collect()
    }
}

fn object_or_empty<'de, D>(deserializer: D) -> std::result::Result<Map<String, Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Object(map)) => map,
        _ => Map::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_subtype_parsing() {
        assert_eq!(NodeSubtype::from("send_email".to_string()), NodeSubtype::SendEmail);
        assert_eq!(NodeSubtype::from("delay".to_string()), NodeSubtype::Delay);
        assert_eq!(
            NodeSubtype::from("slack_message".to_string()),
            NodeSubtype::Unknown("slack_message".into())
        );
        assert_eq!(NodeSubtype::Unknown("slack_message".into()).as_str(), "slack_message");
    }

    #[test]
    fn test_node_deserializes_from_stored_row() {
        let node: WorkflowNode = serde_json::from_value(json!({
            "id": "n1",
            "node_type": "trigger",
            "node_subtype": "form_submitted",
            "order_index": 0,
            "config": null
        }))
        .unwrap();
        assert!(node.is_trigger());
        assert!(node.config.is_empty());
        assert_eq!(node.node_subtype, NodeSubtype::Unknown("form_submitted".into()));
    }

    #[test]
    fn test_unknown_condition_type_is_always() {
        let conn: WorkflowConnection = serde_json::from_value(json!({
            "source_node_id": "a",
            "target_node_id": "b",
            "condition_type": "whenever",
            "condition_config": false
        }))
        .unwrap();
        assert_eq!(conn.condition_type, Some(ConditionType::Always));
        assert!(conn.permits());
    }

    #[test]
    fn test_condition_gates() {
        assert!(!WorkflowConnection::when("a", "b", json!(false)).permits());
        assert!(!WorkflowConnection::when("a", "b", Value::Null).permits());
        assert!(WorkflowConnection::when("a", "b", json!({"field": "status"})).permits());
        assert!(!WorkflowConnection::unless("a", "b", json!("yes")).permits());
        assert!(WorkflowConnection::unless("a", "b", json!(0)).permits());
        assert!(WorkflowConnection::new("a", "b").permits());
    }

    #[test]
    fn test_truthiness() {
        assert!(!is_truthy(&json!("")));
        assert!(!is_truthy(&json!(0.0)));
        assert!(is_truthy(&json!([])));
        assert!(is_truthy(&json!({})));
        assert!(is_truthy(&json!(-1)));
    }

    #[test]
    fn test_node_output_value() {
        let out = NodeOutput::failed("boom").with("status", 500);
        let value = out.to_value();
        assert_eq!(value["success"], json!(false));
        assert_eq!(value["error"], json!("boom"));
        assert_eq!(value["status"], json!(500));

        let parsed: NodeOutput = serde_json::from_value(value).unwrap();
        assert_eq!(parsed, out);
    }

    #[test]
    fn test_outcome_serialization_omits_absent_fields() {
        let fatal = serde_json::to_value(WorkflowOutcome::fatal("No trigger node found")).unwrap();
        assert_eq!(fatal, json!({"success": false, "error": "No trigger node found"}));

        let done = WorkflowOutcome::completed(vec![NodeRun {
            node_id: "t".into(),
            output: NodeOutput::ok(),
        }]);
        let value = serde_json::to_value(&done).unwrap();
        assert_eq!(value["results"][0]["nodeId"], json!("t"));
        assert_eq!(done.executed_ids(), vec!["t"]);
    }
}
