//! SQLite persistence for automations, execution records and tasks.

mod bundle;
mod schema;
mod store;

pub use bundle::{AutomationBundle, SpaceMember};
pub use store::SqliteStore;
