use std::time::Duration;

use reqwest::Method;
use serde_json::{Map, Value};
use tracing::debug;

use bizflow_core::config::WebhookConfig;
use bizflow_core::error::{BizflowError, Result};
use bizflow_core::workflow::NodeOutput;

use super::layers;

const MISSING_URL: &str = "Webhook URL is required";

/// Build the shared outbound client used by `webhook_call` nodes.
pub fn build_http_client(config: &WebhookConfig) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .user_agent(config.user_agent.as_str())
        .build()
        .map_err(|e| BizflowError::Http(e.to_string()))
}

/// `webhook_call`: send the resolved request and report the parsed response.
///
/// A non-2xx status fails the node but still carries the response body.
pub async fn call_webhook(client: &reqwest::Client, config: &Map<String, Value>, input: &Value) -> NodeOutput {
    let fields = layers(config, input, "webhookData");
    let Some(url) = fields.string("url") else {
        return NodeOutput::failed(MISSING_URL);
    };

    let method_name = fields.string_or("method", "POST").to_uppercase();
    let method = match method_name.parse::<Method>() {
        Ok(m) => m,
        Err(_) => return NodeOutput::failed(format!("Invalid webhook method: {}", method_name)),
    };

    let mut request = client.request(method.clone(), url.as_str());
    if let Some(headers) = fields.object("headers") {
        for (name, value) in headers {
            if let Some(value) = header_value(value) {
                request = request.header(name.as_str(), value);
            }
        }
    }
    if method != Method::GET && method != Method::HEAD {
        let body = fields.value("body").cloned().unwrap_or_else(|| input.clone());
        request = request.json(&body);
    }

    debug!(url = %url, method = %method, "Calling webhook");
    let response = match request.send().await {
        Ok(r) => r,
        Err(e) => return NodeOutput::failed(BizflowError::Http(e.to_string()).to_string()),
    };

    let status = response.status();
    let text = match response.text().await {
        Ok(t) => t,
        Err(e) => return NodeOutput::failed(BizflowError::Http(e.to_string()).to_string()),
    };
    let body = serde_json::from_str::<Value>(&text).unwrap_or(Value::String(text));

    let output = if status.is_success() {
        NodeOutput::ok()
    } else {
        NodeOutput::failed(
            format!(
                "Webhook call failed: {} {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("")
            )
            .trim_end()
            .to_string(),
        )
    };
    output.with("status", status.as_u16()).with("response", body)
}

fn header_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
