use serde_json::{Map, Value};

use bizflow_core::traits::TaskCreator;
use bizflow_core::types::NewTask;
use bizflow_core::workflow::NodeOutput;

use super::layers;
use crate::graph::RunScope;

const CREATE_FAILED: &str = "Failed to create task";

/// `create_task`: insert a task on behalf of the executing user.
pub async fn create_task(
    creator: &dyn TaskCreator,
    config: &Map<String, Value>,
    input: &Value,
    scope: RunScope<'_>,
) -> NodeOutput {
    let fields = layers(config, input, "taskData");
    let task = NewTask {
        title: fields.string_or("title", "Automated Task"),
        description: fields.string("description"),
        status: fields.string_or("status", "todo"),
        priority: fields.string_or("priority", "medium"),
        due_date: fields.string("dueDate"),
        assigned_to: fields.string("assignedTo"),
        project_id: fields.string("projectId"),
        space_id: fields
            .string("spaceId")
            .or_else(|| scope.space_id.map(str::to_string)),
    };

    match creator
        .create_task(task, scope.user_id.map(str::to_string))
        .await
    {
        Ok(Some(task)) => match serde_json::to_value(&task) {
            Ok(value) => NodeOutput::ok()
                .with("taskId", task.id.clone())
                .with("task", value),
            Err(e) => NodeOutput::failed(e.to_string()),
        },
        Ok(None) => NodeOutput::failed(CREATE_FAILED),
        Err(e) => NodeOutput::failed(e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bizflow_test_utils::MemoryTaskCreator;
    use serde_json::json;

    #[tokio::test]
    async fn test_defaults_and_scope() {
        let creator = MemoryTaskCreator::new();
        let scope = RunScope::new(Some("user-1"), Some("space-1"));
        let out = create_task(&creator, &Map::new(), &json!({}), scope).await;

        assert!(out.success);
        assert_eq!(out.get("taskId"), Some(&json!("task-1")));
        let task = &creator.tasks()[0];
        assert_eq!(task.title, "Automated Task");
        assert_eq!(task.status, "todo");
        assert_eq!(task.priority, "medium");
        assert_eq!(task.space_id.as_deref(), Some("space-1"));
        assert_eq!(task.created_by.as_deref(), Some("user-1"));
        assert_eq!(out.get("task").and_then(|t| t.get("title")), Some(&json!("Automated Task")));
    }

    #[tokio::test]
    async fn test_field_precedence() {
        let creator = MemoryTaskCreator::new();
        let config = json!({ "title": "Follow up", "priority": "" });
        let input = json!({
            "priority": "low",
            "spaceId": "space-input",
            "taskData": { "priority": "high", "assignedTo": "user-7", "dueDate": "2026-11-01" }
        });
        let out = create_task(
            &creator,
            config.as_object().unwrap(),
            &input,
            RunScope::new(None, Some("space-run")),
        )
        .await;

        assert!(out.success);
        let request = &creator.requests()[0];
        assert_eq!(request.title, "Follow up");
        assert_eq!(request.priority, "high");
        assert_eq!(request.assigned_to.as_deref(), Some("user-7"));
        assert_eq!(request.due_date.as_deref(), Some("2026-11-01"));
        assert_eq!(request.space_id.as_deref(), Some("space-input"));
        assert_eq!(creator.tasks()[0].created_by, None);
    }

    #[tokio::test]
    async fn test_declined_creation() {
        let creator = MemoryTaskCreator::declining();
        let out = create_task(&creator, &Map::new(), &json!({}), RunScope::default()).await;
        assert!(!out.success);
        assert_eq!(out.error.as_deref(), Some("Failed to create task"));
    }
}
