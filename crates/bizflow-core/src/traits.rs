use futures::future::BoxFuture;

use crate::email::{EmailReceipt, InvitationEmail, InvoiceEmail};
use crate::error::Result;
use crate::types::*;

/// Transactional email delivery.
pub trait EmailSender: Send + Sync + 'static {
    /// Sender name (e.g., "log", "http").
    fn name(&self) -> &str;

    /// Deliver an invoice email.
    fn send_invoice_email(&self, email: InvoiceEmail) -> BoxFuture<'_, Result<EmailReceipt>>;

    /// Deliver an invitation or generic notification email.
    fn send_invitation_email(&self, email: InvitationEmail)
        -> BoxFuture<'_, Result<EmailReceipt>>;
}

/// Inserts tasks on behalf of an automation.
pub trait TaskCreator: Send + Sync + 'static {
    /// Create a task. `Ok(None)` means the backend declined to create it.
    fn create_task(
        &self,
        task: NewTask,
        created_by: Option<String>,
    ) -> BoxFuture<'_, Result<Option<Task>>>;
}

/// Persistence backend for automation definitions and run records.
pub trait AutomationStore: Send + Sync + 'static {
    /// Load an automation with its nodes and connections, if it exists and is active.
    fn get_active_automation(&self, id: &str) -> BoxFuture<'_, Result<Option<Automation>>>;

    /// Whether a user belongs to a space.
    fn is_space_member(&self, space_id: &str, user_id: &str) -> BoxFuture<'_, Result<bool>>;

    /// Insert a `running` execution record and return its id.
    fn create_execution(
        &self,
        automation_id: &str,
        user_id: Option<&str>,
        trigger_data: &serde_json::Value,
    ) -> BoxFuture<'_, Result<ExecutionId>>;

    /// Write the final status, timing and payload of an execution.
    fn finish_execution(
        &self,
        id: &ExecutionId,
        update: ExecutionUpdate,
    ) -> BoxFuture<'_, Result<()>>;

    /// Bump run counters and `last_run_at` on the parent automation.
    fn record_run(&self, automation_id: &str, succeeded: bool) -> BoxFuture<'_, Result<()>>;

    /// Most recent executions of an automation, newest first.
    fn list_executions(
        &self,
        automation_id: &str,
        limit: usize,
    ) -> BoxFuture<'_, Result<Vec<ExecutionRecord>>>;
}
