//! Email senders used by `send_email` automation nodes.

mod http;
mod log;

use std::sync::Arc;

use bizflow_core::config::{EmailConfig, EmailProvider};
use bizflow_core::error::Result;
use bizflow_core::traits::EmailSender;

pub use http::HttpEmailSender;
pub use log::LogEmailSender;

/// Build the sender selected by `config.provider`.
pub fn build_email_sender(config: &EmailConfig) -> Result<Arc<dyn EmailSender>> {
    Ok(match config.provider {
        EmailProvider::Log => Arc::new(LogEmailSender::new()),
        EmailProvider::Http => Arc::new(HttpEmailSender::new(config)?),
    })
}
