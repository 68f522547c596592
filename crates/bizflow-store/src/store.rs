use chrono::{DateTime, Utc};
use futures::future::BoxFuture;
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde_json::Value;
use std::fmt::Display;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, warn};

use bizflow_core::error::{BizflowError, Result};
use bizflow_core::traits::{AutomationStore, TaskCreator};
use bizflow_core::types::{
    Automation, ExecutionId, ExecutionRecord, ExecutionStatus, ExecutionUpdate, NewTask, Task,
};
use bizflow_core::workflow::{ConditionType, WorkflowConnection, WorkflowNode};

use crate::schema::SCHEMA;

/// SQLite-backed store for automations, execution records and tasks.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open or create a SQLite database at the given path.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path).map_err(db)?;

        // WAL lets readers proceed while a run is being recorded
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")
            .map_err(db)?;
        Self::init(conn, Some(path))
    }

    /// Open an in-memory database (for testing).
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(db)?;
        Self::init(conn, None)
    }

    fn init(conn: Connection, path: Option<&Path>) -> Result<Self> {
        conn.execute_batch("PRAGMA foreign_keys=ON;").map_err(db)?;
        conn.execute_batch(SCHEMA).map_err(db)?;
        if let Some(path) = path {
            debug!(path = %path.display(), "SQLite store opened");
        }
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(db)
    }

    /// Insert or replace an automation definition.
    ///
    /// Nodes and connections are replaced wholesale. Run counters of an
    /// existing automation are kept.
    pub fn save_automation(&self, automation: &Automation) -> Result<()> {
        let mut conn = self.lock()?;
        let tx = conn.transaction().map_err(db)?;
        let now = Utc::now().to_rfc3339();

        tx.execute(
            "INSERT INTO automations (id, name, user_id, space_id, is_active, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)
             ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                user_id = excluded.user_id,
                space_id = excluded.space_id,
                is_active = excluded.is_active,
                updated_at = excluded.updated_at",
            params![
                automation.id,
                automation.name,
                automation.user_id,
                automation.space_id,
                automation.is_active,
                now
            ],
        )
        .map_err(db)?;

        tx.execute(
            "DELETE FROM automation_nodes WHERE automation_id = ?1",
            params![automation.id],
        )
        .map_err(db)?;
        tx.execute(
            "DELETE FROM automation_connections WHERE automation_id = ?1",
            params![automation.id],
        )
        .map_err(db)?;

        for (position, node) in automation.nodes.iter().enumerate() {
            tx.execute(
                "INSERT INTO automation_nodes
                    (automation_id, id, position, node_type, node_subtype, order_index, config)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    automation.id,
                    node.id,
                    position as i64,
                    node.node_type.as_str(),
                    node.node_subtype.as_str(),
                    node.order_index,
                    Value::Object(node.config.clone()).to_string()
                ],
            )
            .map_err(db)?;
        }

        for connection in &automation.connections {
            tx.execute(
                "INSERT INTO automation_connections
                    (automation_id, source_node_id, target_node_id, condition_type, condition_config)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    automation.id,
                    connection.source_node_id,
                    connection.target_node_id,
                    connection.condition_type.map(condition_to_str),
                    connection.condition_config.to_string()
                ],
            )
            .map_err(db)?;
        }

        tx.commit().map_err(db)?;
        debug!(
            automation_id = %automation.id,
            nodes = automation.nodes.len(),
            connections = automation.connections.len(),
            "Automation saved"
        );
        Ok(())
    }

    /// Load an automation regardless of whether it is active.
    pub fn get_automation(&self, id: &str) -> Result<Option<Automation>> {
        let conn = self.lock()?;
        load_automation(&conn, id, false)
    }

    /// Activate or deactivate an automation. Returns false if it does not exist.
    pub fn set_active(&self, id: &str, active: bool) -> Result<bool> {
        let conn = self.lock()?;
        let changed = conn
            .execute(
                "UPDATE automations SET is_active = ?2, updated_at = ?3 WHERE id = ?1",
                params![id, active, Utc::now().to_rfc3339()],
            )
            .map_err(db)?;
        Ok(changed > 0)
    }

    /// Add a user to a space. Adding an existing member is a no-op.
    pub fn add_space_member(&self, space_id: &str, user_id: &str) -> Result<()> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT OR IGNORE INTO space_members (space_id, user_id, joined_at) VALUES (?1, ?2, ?3)",
            params![space_id, user_id, Utc::now().to_rfc3339()],
        )
        .map_err(db)?;
        Ok(())
    }

    pub fn get_execution(&self, id: &ExecutionId) -> Result<Option<ExecutionRecord>> {
        let conn = self.lock()?;
        conn.query_row(
            "SELECT id, automation_id, user_id, status, trigger_data, result, error,
                    started_at, completed_at, duration_ms
             FROM automation_executions WHERE id = ?1",
            params![id.0],
            execution_from_row,
        )
        .optional()
        .map_err(db)
    }

    /// Tasks, oldest first, optionally restricted to one space.
    pub fn list_tasks(&self, space_id: Option<&str>) -> Result<Vec<Task>> {
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare(
                "SELECT id, title, description, status, priority, due_date, assigned_to,
                        project_id, space_id, created_by, created_at
                 FROM tasks
                 WHERE ?1 IS NULL OR space_id = ?1
                 ORDER BY rowid ASC",
            )
            .map_err(db)?;

        let rows = stmt
            .query_map(params![space_id], |row| {
                Ok(Task {
                    id: row.get(0)?,
                    title: row.get(1)?,
                    description: row.get(2)?,
                    status: row.get(3)?,
                    priority: row.get(4)?,
                    due_date: row.get(5)?,
                    assigned_to: row.get(6)?,
                    project_id: row.get(7)?,
                    space_id: row.get(8)?,
                    created_by: row.get(9)?,
                    created_at: parse_time(&row.get::<_, String>(10)?),
                })
            })
            .map_err(db)?;

        let mut tasks = Vec::new();
        for row in rows {
            tasks.push(row.map_err(db)?);
        }
        Ok(tasks)
    }
}

impl AutomationStore for SqliteStore {
    fn get_active_automation(&self, id: &str) -> BoxFuture<'_, Result<Option<Automation>>> {
        let id = id.to_string();
        Box::pin(async move {
            let conn = self.lock()?;
            load_automation(&conn, &id, true)
        })
    }

    fn is_space_member(&self, space_id: &str, user_id: &str) -> BoxFuture<'_, Result<bool>> {
        let space_id = space_id.to_string();
        let user_id = user_id.to_string();
        Box::pin(async move {
            let conn = self.lock()?;
            let found = conn
                .query_row(
                    "SELECT 1 FROM space_members WHERE space_id = ?1 AND user_id = ?2",
                    params![space_id, user_id],
                    |_| Ok(()),
                )
                .optional()
                .map_err(db)?;
            Ok(found.is_some())
        })
    }

    fn create_execution(
        &self,
        automation_id: &str,
        user_id: Option<&str>,
        trigger_data: &Value,
    ) -> BoxFuture<'_, Result<ExecutionId>> {
        let automation_id = automation_id.to_string();
        let user_id = user_id.map(str::to_string);
        let trigger_data = trigger_data.to_string();
        Box::pin(async move {
            let id = ExecutionId::new();
            let conn = self.lock()?;
            conn.execute(
                "INSERT INTO automation_executions
                    (id, automation_id, user_id, status, trigger_data, started_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    id.0,
                    automation_id,
                    user_id,
                    ExecutionStatus::Running.as_str(),
                    trigger_data,
                    Utc::now().to_rfc3339()
                ],
            )
            .map_err(db)?;
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
            let conn = self.lock()?;
            let changed = conn
                .execute(
                    "UPDATE automation_executions
                     SET status = ?2, result = ?3, error = ?4, completed_at = ?5, duration_ms = ?6
                     WHERE id = ?1",
                    params![
                        id.0,
                        update.status.as_str(),
                        update.result.map(|r| r.to_string()),
                        update.error,
                        Utc::now().to_rfc3339(),
                        update.duration_ms as i64
                    ],
                )
                .map_err(db)?;
            if changed == 0 {
                return Err(BizflowError::Database(format!("execution {} not found", id)));
            }
            Ok(())
        })
    }

    fn record_run(&self, automation_id: &str, succeeded: bool) -> BoxFuture<'_, Result<()>> {
        let automation_id = automation_id.to_string();
        Box::pin(async move {
            let conn = self.lock()?;
            conn.execute(
                "UPDATE automations
                 SET run_count = run_count + 1,
                     success_count = success_count + ?2,
                     failure_count = failure_count + ?3,
                     last_run_at = ?4
                 WHERE id = ?1",
                params![
                    automation_id,
                    succeeded as i64,
                    (!succeeded) as i64,
                    Utc::now().to_rfc3339()
                ],
            )
            .map_err(db)?;
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
            let conn = self.lock()?;
            let mut stmt = conn
                .prepare(
                    "SELECT id, automation_id, user_id, status, trigger_data, result, error,
                            started_at, completed_at, duration_ms
                     FROM automation_executions
                     WHERE automation_id = ?1
                     ORDER BY rowid DESC
                     LIMIT ?2",
                )
                .map_err(db)?;

            let rows = stmt
                .query_map(params![automation_id, limit as i64], execution_from_row)
                .map_err(db)?;

            let mut records = Vec::new();
            for row in rows {
                records.push(row.map_err(db)?);
            }
            Ok(records)
        })
    }
}

impl TaskCreator for SqliteStore {
    fn create_task(
        &self,
        task: NewTask,
        created_by: Option<String>,
    ) -> BoxFuture<'_, Result<Option<Task>>> {
        Box::pin(async move {
            let created = Task {
                id: uuid::Uuid::new_v4().to_string(),
                title: task.title,
                description: task.description,
                status: task.status,
                priority: task.priority,
                due_date: task.due_date,
                assigned_to: task.assigned_to,
                project_id: task.project_id,
                space_id: task.space_id,
                created_by,
                created_at: Utc::now(),
            };

            let conn = self.lock()?;
            conn.execute(
                "INSERT INTO tasks (id, title, description, status, priority, due_date,
                                    assigned_to, project_id, space_id, created_by, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
                params![
                    created.id,
                    created.title,
                    created.description,
                    created.status,
                    created.priority,
                    created.due_date,
                    created.assigned_to,
                    created.project_id,
                    created.space_id,
                    created.created_by,
                    created.created_at.to_rfc3339()
                ],
            )
            .map_err(|e| BizflowError::TaskCreation(e.to_string()))?;
            debug!(task_id = %created.id, "Task created");
            Ok(Some(created))
        })
    }
}

fn load_automation(conn: &Connection, id: &str, active_only: bool) -> Result<Option<Automation>> {
    let automation = conn
        .query_row(
            "SELECT id, name, user_id, space_id, is_active, run_count, success_count,
                    failure_count, last_run_at
             FROM automations
             WHERE id = ?1 AND (?2 = 0 OR is_active = 1)",
            params![id, active_only],
            |row| {
                Ok(Automation {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    user_id: row.get(2)?,
                    space_id: row.get(3)?,
                    is_active: row.get(4)?,
                    run_count: row.get::<_, i64>(5)? as u64,
                    success_count: row.get::<_, i64>(6)? as u64,
                    failure_count: row.get::<_, i64>(7)? as u64,
                    last_run_at: row.get::<_, Option<String>>(8)?.map(|s| parse_time(&s)),
                    nodes: Vec::new(),
                    connections: Vec::new(),
                })
            },
        )
        .optional()
        .map_err(db)?;

    let Some(mut automation) = automation else {
        return Ok(None);
    };
    automation.nodes = load_nodes(conn, id)?;
    automation.connections = load_connections(conn, id)?;
    Ok(Some(automation))
}

fn load_nodes(conn: &Connection, automation_id: &str) -> Result<Vec<WorkflowNode>> {
    let mut stmt = conn
        .prepare(
            "SELECT id, node_type, node_subtype, order_index, config
             FROM automation_nodes
             WHERE automation_id = ?1
             ORDER BY position ASC",
        )
        .map_err(db)?;

    let rows = stmt
        .query_map(params![automation_id], |row| {
            let config: String = row.get(4)?;
            Ok(WorkflowNode {
                id: row.get(0)?,
                node_type: row.get::<_, String>(1)?.into(),
                node_subtype: row.get::<_, String>(2)?.into(),
                order_index: row.get(3)?,
                config: match serde_json::from_str(&config) {
                    Ok(Value::Object(map)) => map,
                    _ => Default::default(),
                },
            })
        })
        .map_err(db)?;

    let mut nodes = Vec::new();
    for row in rows {
        nodes.push(row.map_err(db)?);
    }
    Ok(nodes)
}

fn load_connections(conn: &Connection, automation_id: &str) -> Result<Vec<WorkflowConnection>> {
    let mut stmt = conn
        .prepare(
            "SELECT source_node_id, target_node_id, condition_type, condition_config
             FROM automation_connections
             WHERE automation_id = ?1
             ORDER BY id ASC",
        )
        .map_err(db)?;

    let rows = stmt
        .query_map(params![automation_id], |row| {
            let condition_type: Option<String> = row.get(2)?;
            let condition_config: String = row.get(3)?;
            Ok(WorkflowConnection {
                source_node_id: row.get(0)?,
                target_node_id: row.get(1)?,
                condition_type: condition_type.as_deref().map(condition_from_str),
                condition_config: serde_json::from_str(&condition_config).unwrap_or(Value::Null),
            })
        })
        .map_err(db)?;

    let mut connections = Vec::new();
    for row in rows {
        connections.push(row.map_err(db)?);
    }
    Ok(connections)
}

fn execution_from_row(row: &Row<'_>) -> rusqlite::Result<ExecutionRecord> {
    let status: String = row.get(3)?;
    let trigger_data: String = row.get(4)?;
    let result: Option<String> = row.get(5)?;
    Ok(ExecutionRecord {
        id: ExecutionId(row.get(0)?),
        automation_id: row.get(1)?,
        user_id: row.get(2)?,
        status: ExecutionStatus::parse(&status).unwrap_or(ExecutionStatus::Failed),
        trigger_data: serde_json::from_str(&trigger_data).unwrap_or(Value::Null),
        result: result.and_then(|r| serde_json::from_str(&r).ok()),
        error: row.get(6)?,
        started_at: parse_time(&row.get::<_, String>(7)?),
        completed_at: row.get::<_, Option<String>>(8)?.map(|s| parse_time(&s)),
        duration_ms: row.get::<_, Option<i64>>(9)?.map(|d| d.max(0) as u64),
    })
}

fn condition_to_str(condition: ConditionType) -> &'static str {
    match condition {
        ConditionType::If => "if",
        ConditionType::Unless => "unless",
        ConditionType::Always => "always",
    }
}

fn condition_from_str(s: &str) -> ConditionType {
    match s {
        "if" => ConditionType::If,
        "unless" => ConditionType::Unless,
        _ => ConditionType::Always,
    }
}

/// Stored timestamps are RFC 3339. Unparseable values read back as the Unix epoch.
fn parse_time(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|e| {
            warn!(value = s, error = %e, "Corrupt timestamp in database");
            DateTime::<Utc>::default()
        })
}

fn db(e: impl Display) -> BizflowError {
    BizflowError::Database(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bizflow_test_utils::fixtures::{linear_chain, notify_automation};
    use serde_json::json;

    fn conditional_automation() -> Automation {
        let (mut nodes, mut connections) = linear_chain();
        nodes[1] = nodes[1].clone().with_config(json!({ "note": "second" }));
        connections.push(WorkflowConnection::when("a", "c", json!({ "field": "paid" })));
        connections.push(WorkflowConnection::unless("b", "c", json!(false)));
        Automation::new("auto-1", "Chain", "owner")
            .with_space("space-1")
            .with_graph(nodes, connections)
    }

    #[tokio::test]
    async fn test_automation_round_trip() {
        let store = SqliteStore::in_memory().unwrap();
        let automation = conditional_automation();
        store.save_automation(&automation).unwrap();

        let loaded = store.get_active_automation("auto-1").await.unwrap().unwrap();
        assert_eq!(loaded.name, "Chain");
        assert_eq!(loaded.space_id.as_deref(), Some("space-1"));
        assert_eq!(loaded.nodes, automation.nodes);
        assert_eq!(loaded.connections, automation.connections);
    }

    #[tokio::test]
    async fn test_inactive_automation_hidden() {
        let store = SqliteStore::in_memory().unwrap();
        store.save_automation(&notify_automation("auto-1", "owner", "space-1")).unwrap();

        assert!(store.set_active("auto-1", false).unwrap());
        assert!(store.get_active_automation("auto-1").await.unwrap().is_none());
        assert!(store.get_automation("auto-1").unwrap().is_some());
        assert!(!store.set_active("missing", true).unwrap());
    }

    #[tokio::test]
    async fn test_resave_replaces_graph_and_keeps_counters() {
        let store = SqliteStore::in_memory().unwrap();
        store.save_automation(&conditional_automation()).unwrap();
        store.record_run("auto-1", true).await.unwrap();

        let trimmed = Automation::new("auto-1", "Renamed", "owner")
            .with_graph(vec![WorkflowNode::trigger("t")], vec![]);
        store.save_automation(&trimmed).unwrap();

        let loaded = store.get_automation("auto-1").unwrap().unwrap();
        assert_eq!(loaded.name, "Renamed");
        assert_eq!(loaded.nodes.len(), 1);
        assert!(loaded.connections.is_empty());
        assert_eq!(loaded.run_count, 1);
    }

    #[tokio::test]
    async fn test_space_membership() {
        let store = SqliteStore::in_memory().unwrap();
        store.add_space_member("space-1", "ada").unwrap();
        store.add_space_member("space-1", "ada").unwrap();

        assert!(store.is_space_member("space-1", "ada").await.unwrap());
        assert!(!store.is_space_member("space-2", "ada").await.unwrap());
    }

    #[tokio::test]
    async fn test_execution_lifecycle() {
        let store = SqliteStore::in_memory().unwrap();
        store.save_automation(&notify_automation("auto-1", "owner", "space-1")).unwrap();

        let id = store
            .create_execution("auto-1", Some("owner"), &json!({ "lead": "Ada" }))
            .await
            .unwrap();
        let running = store.get_execution(&id).unwrap().unwrap();
        assert_eq!(running.status, ExecutionStatus::Running);
        assert_eq!(running.trigger_data, json!({ "lead": "Ada" }));
        assert!(running.completed_at.is_none());

        store
            .finish_execution(
                &id,
                ExecutionUpdate {
                    status: ExecutionStatus::Completed,
                    result: Some(json!({ "success": true, "results": [] })),
                    error: None,
                    duration_ms: 12,
                },
            )
            .await
            .unwrap();
        store.record_run("auto-1", true).await.unwrap();

        let done = store.get_execution(&id).unwrap().unwrap();
        assert_eq!(done.status, ExecutionStatus::Completed);
        assert_eq!(done.duration_ms, Some(12));
        assert_eq!(done.result, Some(json!({ "success": true, "results": [] })));
        assert!(done.completed_at.is_some());

        let automation = store.get_automation("auto-1").unwrap().unwrap();
        assert_eq!(automation.run_count, 1);
        assert_eq!(automation.success_count, 1);
        assert_eq!(automation.failure_count, 0);
        assert!(automation.last_run_at.is_some());
    }

    #[tokio::test]
    async fn test_finish_unknown_execution_fails() {
        let store = SqliteStore::in_memory().unwrap();
        let update = ExecutionUpdate {
            status: ExecutionStatus::Failed,
            result: None,
            error: Some("boom".into()),
            duration_ms: 0,
        };
        let err = store
            .finish_execution(&ExecutionId::from_string("nope"), update)
            .await
            .unwrap_err();
        assert!(matches!(err, BizflowError::Database(_)));
    }

    #[tokio::test]
    async fn test_list_executions_newest_first() {
        let store = SqliteStore::in_memory().unwrap();
        let mut ids = Vec::new();
        for n in 0..3 {
            ids.push(store.create_execution("auto-1", None, &json!({ "n": n })).await.unwrap());
        }
        store.create_execution("auto-2", None, &json!({})).await.unwrap();

        let recent = store.list_executions("auto-1", 2).await.unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].id, ids[2]);
        assert_eq!(recent[1].id, ids[1]);
        assert!(recent[0].user_id.is_none());
    }

    #[tokio::test]
    async fn test_create_and_list_tasks() {
        let store = SqliteStore::in_memory().unwrap();
        let task = NewTask {
            title: "Call back".into(),
            status: "todo".into(),
            priority: "high".into(),
            space_id: Some("space-1".into()),
            ..Default::default()
        };
        let created = store
            .create_task(task, Some("owner".into()))
            .await
            .unwrap()
            .unwrap();
        store
            .create_task(
                NewTask {
                    title: "Elsewhere".into(),
                    status: "todo".into(),
                    priority: "low".into(),
                    ..Default::default()
                },
                None,
            )
            .await
            .unwrap();

        let in_space = store.list_tasks(Some("space-1")).unwrap();
        assert_eq!(in_space.len(), 1);
        assert_eq!(in_space[0].id, created.id);
        assert_eq!(in_space[0].created_by.as_deref(), Some("owner"));
        assert_eq!(store.list_tasks(None).unwrap().len(), 2);
    }

    #[test]
    fn test_open_file_database() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("bizflow.db");
        {
            let store = SqliteStore::open(&path).unwrap();
            store.save_automation(&notify_automation("auto-1", "owner", "space-1")).unwrap();
        }
        let reopened = SqliteStore::open(&path).unwrap();
        assert!(reopened.get_automation("auto-1").unwrap().is_some());
    }

    #[test]
    fn test_open_below_a_file_is_io_error() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let path = file.path().join("bizflow.db");
        let err = SqliteStore::open(&path).err().unwrap();
        assert!(matches!(err, BizflowError::Io(_)));
    }

    #[tokio::test]
    async fn test_corrupt_timestamp_reads_as_epoch() {
        let store = SqliteStore::in_memory().unwrap();
        store.save_automation(&notify_automation("auto-1", "owner", "space-1")).unwrap();
        let id = store
            .create_execution("auto-1", Some("owner"), &json!({}))
            .await
            .unwrap();
        store
            .lock()
            .unwrap()
            .execute(
                "UPDATE automation_executions SET started_at = 'yesterday' WHERE id = ?1",
                params![id.0],
            )
            .unwrap();

        let record = store.get_execution(&id).unwrap().unwrap();
        assert_eq!(record.started_at, DateTime::<Utc>::default());
        assert_eq!(record.started_at.timestamp(), 0);
    }
}
