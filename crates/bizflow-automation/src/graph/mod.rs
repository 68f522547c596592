//! Automation graph execution.
//!
//! An automation is a set of `WorkflowNode`s linked by `WorkflowConnection`s.
//! The `WorkflowExecutor` sorts nodes by `order_index`, runs the first trigger
//! with the trigger payload, then makes one forward pass over the rest. A node
//! runs only when every upstream node has already run and every incoming
//! connection's condition permits it; otherwise it is skipped for the run.
//!
//! Each node receives the output of its first upstream node, or the trigger
//! payload when it has none. Node failures stay inside that node's output and
//! never stop the walk.

pub mod context;
pub mod executor;

pub use context::ExecutionContext;
pub use executor::{RunScope, WorkflowExecutor};
