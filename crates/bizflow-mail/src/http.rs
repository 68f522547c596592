use std::time::Duration;

use futures::future::BoxFuture;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{debug, warn};

use bizflow_core::config::EmailConfig;
use bizflow_core::email::{EmailReceipt, InvitationEmail, InvoiceEmail};
use bizflow_core::error::{BizflowError, Result};
use bizflow_core::traits::EmailSender;

/// Delivers emails through a transactional email HTTP API.
///
/// Each email is POSTed as JSON to `{endpoint}/emails/{template}` with the
/// configured sender address and a bearer API key. Any non-2xx response is
/// an [`BizflowError::Email`].
pub struct HttpEmailSender {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
    from: String,
}

impl HttpEmailSender {
    pub fn new(config: &EmailConfig) -> Result<Self> {
        let endpoint = config
            .endpoint
            .as_deref()
            .filter(|e| !e.is_empty())
            .ok_or_else(|| BizflowError::Config("email.endpoint is required for the http provider".into()))?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| BizflowError::Http(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            from: config.from.clone(),
        })
    }

    async fn deliver<T: Serialize>(&self, template: &str, to: &str, payload: &T) -> Result<EmailReceipt> {
        let url = format!("{}/emails/{}", self.endpoint, template);
        let body = json!({
            "from": self.from,
            "to": to,
            "template": template,
            "data": payload,
        });

        let mut request = self.client.post(&url).json(&body);
        if let Some(ref key) = self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| BizflowError::Email(e.to_string()))?;
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| BizflowError::Email(format!("reading response: {}", e)))?;

        if !status.is_success() {
            warn!(template, status = status.as_u16(), "Email API rejected message");
            return Err(BizflowError::Email(format!(
                "{} {}: {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or(""),
                text
            )));
        }

        let id = serde_json::from_str::<Value>(&text)
            .ok()
            .and_then(|v| v.get("id").and_then(Value::as_str).map(str::to_string));
        debug!(template, to, id = id.as_deref().unwrap_or(""), "Email delivered");
        Ok(EmailReceipt { id })
    }
}

impl EmailSender for HttpEmailSender {
    fn name(&self) -> &str {
        "http"
    }

    fn send_invoice_email(&self, email: InvoiceEmail) -> BoxFuture<'_, Result<EmailReceipt>> {
        Box::pin(async move { self.deliver("invoice", &email.to, &email).await })
    }

    fn send_invitation_email(
        &self,
        email: InvitationEmail,
    ) -> BoxFuture<'_, Result<EmailReceipt>> {
        Box::pin(async move { self.deliver("invitation", &email.to, &email).await })
    }
}
