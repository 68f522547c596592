use thiserror::Error;

#[derive(Debug, Error)]
pub enum BizflowError {
    // Workflow errors
    #[error("Invalid workflow definition: {0}")]
    InvalidWorkflow(String),

    // Collaborator errors
    #[error("Email delivery failed: {0}")]
    Email(String),

    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("Task creation failed: {0}")]
    TaskCreation(String),

    // Config errors
    #[error("Config error: {0}")]
    Config(String),

    #[error("Config file not found: {0}")]
    ConfigNotFound(String),

    // Storage errors
    #[error("Database error: {0}")]
    Database(String),

    // I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // JSON errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, BizflowError>;
