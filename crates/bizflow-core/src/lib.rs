pub mod config;
pub mod email;
pub mod error;
pub mod resolve;
pub mod traits;
pub mod types;
pub mod workflow;

pub use config::AppConfig;
pub use error::{BizflowError, Result};
pub use resolve::Layers;
pub use types::*;
pub use workflow::*;
