use std::sync::Arc;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{info, warn};

use bizflow_core::error::BizflowError;
use bizflow_core::traits::AutomationStore;
use bizflow_core::types::{
    Automation, Caller, ExecutionId, ExecutionRecord, ExecutionStatus, ExecutionUpdate,
};
use bizflow_core::workflow::WorkflowOutcome;

use crate::graph::{RunScope, WorkflowExecutor};

/// Failure of a service call, before or around a run.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Automation ID is required")]
    MissingAutomationId,

    #[error("Automation not found or not active")]
    NotFound,

    #[error("Access denied")]
    AccessDenied,

    #[error(transparent)]
    Internal(#[from] BizflowError),
}

/// What a successful `execute` call returns.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionReport {
    pub execution_id: ExecutionId,
    pub result: WorkflowOutcome,
}

/// Loads automations, checks access, runs them and records the outcome.
pub struct AutomationService {
    store: Arc<dyn AutomationStore>,
    executor: Arc<WorkflowExecutor>,
}

impl AutomationService {
    pub fn new(store: Arc<dyn AutomationStore>, executor: Arc<WorkflowExecutor>) -> Self {
        Self { store, executor }
    }

    /// Run an automation for `caller`.
    ///
    /// Node failures do not make this return an error; they are reported in
    /// `result`. The execution record is written before the run and updated
    /// after it.
    pub async fn execute(
        &self,
        caller: &Caller,
        automation_id: &str,
        trigger_data: Value,
    ) -> Result<ExecutionReport, ServiceError> {
        let automation = self.load_authorized(caller, automation_id).await?;

        let execution_id = self
            .store
            .create_execution(&automation.id, Some(caller.user_id.as_str()), &trigger_data)
            .await?;
        info!(
            automation_id = %automation.id,
            execution_id = %execution_id,
            user_id = %caller.user_id,
            "Automation run started"
        );

        let start = Instant::now();
        let scope = RunScope::new(Some(caller.user_id.as_str()), automation.space_id.as_deref());
        let result = self
            .executor
            .execute_workflow(&automation.nodes, &automation.connections, &trigger_data, scope)
            .await;
        let duration_ms = start.elapsed().as_millis() as u64;

        let status = if result.success {
            ExecutionStatus::Completed
        } else {
            ExecutionStatus::Failed
        };
        let update = ExecutionUpdate {
            status,
            result: Some(serde_json::to_value(&result).map_err(BizflowError::from)?),
            error: result.error.clone(),
            duration_ms,
        };
        self.store.finish_execution(&execution_id, update).await?;
        self.store.record_run(&automation.id, result.success).await?;

        if result.success {
            info!(
                automation_id = %automation.id,
                execution_id = %execution_id,
                duration_ms,
                "Automation run completed"
            );
        } else {
            warn!(
                automation_id = %automation.id,
                execution_id = %execution_id,
                error = result.error.as_deref().unwrap_or(""),
                "Automation run failed"
            );
        }

        Ok(ExecutionReport {
            execution_id,
            result,
        })
    }

    /// Recent executions of an automation, newest first, under the same access rules as `execute`.
    pub async fn executions(
        &self,
        caller: &Caller,
        automation_id: &str,
        limit: usize,
    ) -> Result<Vec<ExecutionRecord>, ServiceError> {
        let automation = self.load_authorized(caller, automation_id).await?;
        Ok(self.store.list_executions(&automation.id, limit).await?)
    }

    async fn load_authorized(
        &self,
        caller: &Caller,
        automation_id: &str,
    ) -> Result<Automation, ServiceError> {
        let automation_id = automation_id.trim();
        if automation_id.is_empty() {
            return Err(ServiceError::MissingAutomationId);
        }

        let automation = self
            .store
            .get_active_automation(automation_id)
            .await?
            .ok_or(ServiceError::NotFound)?;

        if !self.can_access(caller, &automation).await? {
            warn!(
                automation_id = %automation.id,
                user_id = %caller.user_id,
                "Automation access denied"
            );
            return Err(ServiceError::AccessDenied);
        }
        Ok(automation)
    }

    /// Owners, members of the automation's space, and admins may run it.
    async fn can_access(&self, caller: &Caller, automation: &Automation) -> Result<bool, ServiceError> {
        if automation.user_id == caller.user_id || caller.role.is_admin() {
            return Ok(true);
        }
        match automation.space_id.as_deref() {
            Some(space_id) => Ok(self.store.is_space_member(space_id, &caller.user_id).await?),
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bizflow_core::types::UserRole;
    use bizflow_test_utils::fixtures::{notify_automation, passthrough};
    use bizflow_test_utils::{MemoryStore, MemoryTaskCreator, RecordingEmailSender};
    use serde_json::json;

    use crate::nodes::NodeDispatcher;

    struct Harness {
        store: Arc<MemoryStore>,
        email: Arc<RecordingEmailSender>,
        service: AutomationService,
    }

    fn harness() -> Harness {
        let store = Arc::new(MemoryStore::new());
        let email = Arc::new(RecordingEmailSender::new());
        let executor = Arc::new(WorkflowExecutor::new(NodeDispatcher::new(
            email.clone(),
            Arc::new(MemoryTaskCreator::new()),
            reqwest::Client::new(),
        )));
        store.insert(notify_automation("auto-1", "owner", "space-1"));
        Harness {
            service: AutomationService::new(store.clone(), executor),
            store,
            email,
        }
    }

    fn member(id: &str) -> Caller {
        Caller::new(id, UserRole::Member)
    }

    #[tokio::test]
    async fn test_owner_run_records_execution() {
        let h = harness();
        let report = h
            .service
            .execute(&member("owner"), "auto-1", json!({ "to": "lead@example.com" }))
            .await
            .unwrap();

        assert!(report.result.success);
        assert_eq!(report.result.executed_ids(), vec!["trigger", "email"]);
        assert_eq!(h.email.invitations()[0].to, "lead@example.com");

        let executions = h.store.executions();
        assert_eq!(executions.len(), 1);
        let record = &executions[0];
        assert_eq!(record.id, report.execution_id);
        assert_eq!(record.status, ExecutionStatus::Completed);
        assert_eq!(record.user_id.as_deref(), Some("owner"));
        assert_eq!(record.trigger_data, json!({ "to": "lead@example.com" }));
        assert!(record.duration_ms.is_some());
        assert_eq!(record.result.as_ref().unwrap()["success"], json!(true));

        let automation = h.store.automation("auto-1").unwrap();
        assert_eq!(automation.run_count, 1);
        assert_eq!(automation.success_count, 1);
        assert!(automation.last_run_at.is_some());
    }

    #[tokio::test]
    async fn test_node_failure_still_completes() {
        let h = harness();
        let report = h.service.execute(&member("owner"), "auto-1", json!({})).await.unwrap();

        assert!(report.result.success);
        let email = report.result.output_of("email").unwrap();
        assert_eq!(email.error.as_deref(), Some("Recipient email is required"));
        assert_eq!(h.store.executions()[0].status, ExecutionStatus::Completed);
    }

    #[tokio::test]
    async fn test_missing_id() {
        let h = harness();
        let err = h.service.execute(&member("owner"), "  ", json!({})).await.unwrap_err();
        assert!(matches!(err, ServiceError::MissingAutomationId));
        assert_eq!(err.to_string(), "Automation ID is required");
    }

    #[tokio::test]
    async fn test_unknown_and_inactive_are_not_found() {
        let h = harness();
        let err = h.service.execute(&member("owner"), "nope", json!({})).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound));

        let mut inactive = notify_automation("auto-2", "owner", "space-1");
        inactive.is_active = false;
        h.store.insert(inactive);
        let err = h.service.execute(&member("owner"), "auto-2", json!({})).await.unwrap_err();
        assert_eq!(err.to_string(), "Automation not found or not active");
        assert!(h.store.executions().is_empty());
    }

    #[tokio::test]
    async fn test_stranger_is_denied() {
        let h = harness();
        let err = h.service.execute(&member("stranger"), "auto-1", json!({})).await.unwrap_err();
        assert!(matches!(err, ServiceError::AccessDenied));
        assert!(h.store.executions().is_empty());
        assert_eq!(h.store.automation("auto-1").unwrap().run_count, 0);
    }

    #[tokio::test]
    async fn test_space_member_and_admin_allowed() {
        let h = harness();
        h.store.add_member("space-1", "colleague");

        assert!(h.service.execute(&member("colleague"), "auto-1", json!({})).await.is_ok());
        let admin = Caller::new("ops", UserRole::SystemAdmin);
        assert!(h.service.execute(&admin, "auto-1", json!({})).await.is_ok());
        assert_eq!(h.store.automation("auto-1").unwrap().run_count, 2);
    }

    #[tokio::test]
    async fn test_missing_trigger_marks_run_failed() {
        let h = harness();
        h.store.insert(
            Automation::new("broken", "No trigger", "owner").with_graph(vec![passthrough("a", 0)], vec![]),
        );
        let report = h.service.execute(&member("owner"), "broken", json!({})).await.unwrap();

        assert!(!report.result.success);
        let record = &h.store.executions()[0];
        assert_eq!(record.status, ExecutionStatus::Failed);
        assert_eq!(record.error.as_deref(), Some("No trigger node found"));

        let automation = h.store.automation("broken").unwrap();
        assert_eq!(automation.failure_count, 1);
        assert_eq!(automation.success_count, 0);
    }

    #[tokio::test]
    async fn test_executions_listing() {
        let h = harness();
        for n in 0..3 {
            h.service.execute(&member("owner"), "auto-1", json!({ "n": n })).await.unwrap();
        }

        let recent = h.service.executions(&member("owner"), "auto-1", 2).await.unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].trigger_data, json!({ "n": 2 }));

        let err = h.service.executions(&member("stranger"), "auto-1", 10).await.unwrap_err();
        assert!(matches!(err, ServiceError::AccessDenied));
    }

    #[test]
    fn test_report_serialization() {
        let report = ExecutionReport {
            execution_id: ExecutionId::from_string("exec-1"),
            result: WorkflowOutcome::completed(vec![]),
        };
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["executionId"], json!("exec-1"));
        assert_eq!(value["result"]["success"], json!(true));
    }
}
