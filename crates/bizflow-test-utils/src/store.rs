use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use chrono::Utc;
use futures::future::BoxFuture;

use bizflow_core::error::{BizflowError, Result};
use bizflow_core::traits::{AutomationStore, TaskCreator};
use bizflow_core::types::{
    Automation, ExecutionId, ExecutionRecord, ExecutionStatus, ExecutionUpdate, NewTask, Task,
};

/// In-memory automation store.
#[derive(Default)]
pub struct MemoryStore {
    automations: Mutex<HashMap<String, Automation>>,
    members: Mutex<HashSet<(String, String)>>,
    executions: Mutex<Vec<ExecutionRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, automation: Automation) {
        self.automations
            .lock()
            .unwrap()
            .insert(automation.id.clone(), automation);
    }

    pub fn add_member(&self, space_id: &str, user_id: &str) {
        self.members
            .lock()
            .unwrap()
            .insert((space_id.to_string(), user_id.to_string()));
    }

    pub fn automation(&self, id: &str) -> Option<Automation> {
        self.automations.lock().unwrap().get(id).cloned()
    }

    /// All execution records, oldest first.
    pub fn executions(&self) -> Vec<ExecutionRecord> {
        self.executions.lock().unwrap().clone()
    }
}

impl AutomationStore for MemoryStore {
    fn get_active_automation(&self, id: &str) -> BoxFuture<'_, Result<Option<Automation>>> {
        let id = id.to_string();
        Box::pin(async move {
            Ok(self
                .automations
                .lock()
                .unwrap()
                .get(&id)
                .filter(|a| a.is_active)
                .cloned())
        })
    }

    fn is_space_member(&self, space_id: &str, user_id: &str) -> BoxFuture<'_, Result<bool>> {
        let key = (space_id.to_string(), user_id.to_string());
        Box::pin(async move { Ok(self.members.lock().unwrap().contains(&key)) })
    }

    fn create_execution(
        &self,
        automation_id: &str,
        user_id: Option<&str>,
        trigger_data: &serde_json::Value,
    ) -> BoxFuture<'_, Result<ExecutionId>> {
        let record = ExecutionRecord {
            id: ExecutionId::new(),
            automation_id: automation_id.to_string(),
            user_id: user_id.map(str::to_string),
            status: ExecutionStatus::Running,
            trigger_data: trigger_data.clone(),
            result: None,
            error: None,
            started_at: Utc::now(),
            completed_at: None,
            duration_ms: None,
        };
        Box::pin(async move {
            let id = record.id.clone();
            self.executions.lock().unwrap().push(record);
            Ok(id)
        })
    }

    fn finish_execution(
        &self,
        id: &ExecutionId,
        update: ExecutionUpdate,
    ) -> BoxFuture<'_, Result<()>> {
        let id = id.clone();
        Box::pin(async move {
            let mut executions = self.executions.lock().unwrap();
            let record = executions
                .iter_mut()
                .find(|r| r.id == id)
                .ok_or_else(|| BizflowError::Database(format!("execution {} not found", id)))?;
            record.status = update.status;
            record.result = update.result;
            record.error = update.error;
            record.duration_ms = Some(update.duration_ms);
            record.completed_at = Some(Utc::now());
            Ok(())
        })
    }

    fn record_run(&self, automation_id: &str, succeeded: bool) -> BoxFuture<'_, Result<()>> {
        let automation_id = automation_id.to_string();
        Box::pin(async move {
            let mut automations = self.automations.lock().unwrap();
            if let Some(a) = automations.get_mut(&automation_id) {
                a.run_count += 1;
                if succeeded {
                    a.success_count += 1;
                } else {
                    a.failure_count += 1;
                }
                a.last_run_at = Some(Utc::now());
            }
            Ok(())
        })
    }

    fn list_executions(
        &self,
        automation_id: &str,
        limit: usize,
    ) -> BoxFuture<'_, Result<Vec<ExecutionRecord>>> {
        let automation_id = automation_id.to_string();
        Box::pin(async move {
            Ok(self
                .executions
                .lock()
                .unwrap()
                .iter()
                .rev()
                .filter(|r| r.automation_id == automation_id)
                .take(limit)
                .cloned()
                .collect())
        })
    }
}

/// Task creator that keeps tasks in memory.
#[derive(Default)]
pub struct MemoryTaskCreator {
    tasks: Mutex<Vec<(Task, NewTask)>>,
    decline: bool,
}

impl MemoryTaskCreator {
    pub fn new() -> Self {
        Self::default()
    }

    /// A creator that never creates anything.
    pub fn declining() -> Self {
        Self {
            decline: true,
            ..Self::default()
        }
    }

    pub fn tasks(&self) -> Vec<Task> {
        self.tasks.lock().unwrap().iter().map(|(t, _)| t.clone()).collect()
    }

    /// The raw requests, in creation order.
    pub fn requests(&self) -> Vec<NewTask> {
        self.tasks.lock().unwrap().iter().map(|(_, r)| r.clone()).collect()
    }
}

impl TaskCreator for MemoryTaskCreator {
    fn create_task(
        &self,
        task: NewTask,
        created_by: Option<String>,
    ) -> BoxFuture<'_, Result<Option<Task>>> {
        Box::pin(async move {
            if self.decline {
                return Ok(None);
            }
            let mut tasks = self.tasks.lock().unwrap();
            let created = Task {
                id: format!("task-{}", tasks.len() + 1),
                title: task.title.clone(),
                description: task.description.clone(),
                status: task.status.clone(),
                priority: task.priority.clone(),
                due_date: task.due_date.clone(),
                assigned_to: task.assigned_to.clone(),
                project_id: task.project_id.clone(),
                space_id: task.space_id.clone(),
                created_by,
                created_at: Utc::now(),
            };
            tasks.push((created.clone(), task));
            Ok(Some(created))
        })
    }
}
