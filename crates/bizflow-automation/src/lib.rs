pub mod graph;
pub mod nodes;
pub mod service;

pub use graph::{ExecutionContext, RunScope, WorkflowExecutor};
pub use nodes::NodeDispatcher;
pub use service::{AutomationService, ExecutionReport, ServiceError};
