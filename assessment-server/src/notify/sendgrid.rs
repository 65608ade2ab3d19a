//! SendGrid v3 mail transport

use assessment_common::config::EmailConfig;
use assessment_common::{Error, Result};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::time::Duration;

use super::{MailTransport, OutgoingMail};

/// SendGrid mail send endpoint
pub const SENDGRID_ENDPOINT: &str = "https://api.sendgrid.com/v3/mail/send";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Delivers mail through the SendGrid v3 API
///
/// Missing credentials are not an error at construction: the service still
/// starts, and each delivery attempt fails with `Error::Config`.
pub struct SendGridTransport {
    http_client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
    sender_email: Option<String>,
    sender_name: String,
}

impl SendGridTransport {
    pub fn new(email: &EmailConfig) -> Result<Self> {
        Self::with_endpoint(email, SENDGRID_ENDPOINT)
    }

    /// Transport posting to a custom endpoint
    pub fn with_endpoint(email: &EmailConfig, endpoint: impl Into<String>) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .user_agent(concat!("assessment-server/", env!("CARGO_PKG_VERSION")))
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| Error::Http(format!("HTTP client setup failed: {}", e)))?;

        Ok(Self {
            http_client,
            endpoint: endpoint.into(),
            api_key: email.sendgrid_api_key.clone(),
            sender_email: email.sender_email.clone(),
            sender_name: email.sender_name.clone(),
        })
    }

    /// Request body for one message
    pub fn request_body(&self, sender_email: &str, mail: &OutgoingMail) -> Value {
        let mut content = Vec::new();
        if let Some(text) = &mail.text {
            content.push(json!({ "type": "text/plain", "value": text }));
        }
        content.push(json!({ "type": "text/html", "value": mail.html }));

        json!({
            "personalizations": [{ "to": [{ "email": mail.to }] }],
            "from": { "email": sender_email, "name": self.sender_name },
            "subject": mail.subject,
            "content": content,
        })
    }
}

#[async_trait]
impl MailTransport for SendGridTransport {
    fn name(&self) -> &'static str {
        "sendgrid"
    }

    async fn deliver(&self, mail: &OutgoingMail) -> Result<()> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| Error::Config("SendGrid API key not configured".to_string()))?;
        let sender_email = self
            .sender_email
            .as_deref()
            .ok_or_else(|| Error::Config("SendGrid sender email not configured".to_string()))?;

        tracing::debug!(to = %mail.to, subject = %mail.subject, "Posting mail to SendGrid");

        let response = self
            .http_client
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .json(&self.request_body(sender_email, mail))
            .send()
            .await
            .map_err(|e| Error::Http(format!("SendGrid request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(Error::Http(format!(
                "SendGrid returned {}: {}",
                status.as_u16(),
                error_text
            )));
        }

        Ok(())
    }
}
