//! Reviewer notification
//!
//! `Notifier` renders an assessment summary and hands it to a `MailTransport`
//! exactly once. Delivery failures are logged and reported as `false`; they
//! never propagate to the caller and never touch the stored result.

pub mod render;
pub mod sendgrid;
pub mod worker;

use assessment_common::{AssessmentResult, Questionnaire, Result};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{error, info};

pub use sendgrid::SendGridTransport;
pub use worker::NotificationQueue;

/// A rendered message ready for delivery
#[derive(Debug, Clone, PartialEq)]
pub struct OutgoingMail {
    pub to: String,
    pub subject: String,
    pub html: String,
    /// Plain-text alternative
    pub text: Option<String>,
}

/// Delivery backend: given a rendered message, attempt delivery once
#[async_trait]
pub trait MailTransport: Send + Sync {
    /// Short backend name for logs and diagnostics
    fn name(&self) -> &'static str;

    async fn deliver(&self, mail: &OutgoingMail) -> Result<()>;
}

/// Composes and sends assessment summaries
#[derive(Clone)]
pub struct Notifier {
    transport: Arc<dyn MailTransport>,
    questionnaire: Arc<Questionnaire>,
    public_base_url: String,
}

impl Notifier {
    pub fn new(
        transport: Arc<dyn MailTransport>,
        questionnaire: Questionnaire,
        public_base_url: impl Into<String>,
    ) -> Self {
        Self {
            transport,
            questionnaire: Arc::new(questionnaire),
            public_base_url: public_base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn transport_name(&self) -> &'static str {
        self.transport.name()
    }

    /// Render the summary email for `result`
    pub fn compose(&self, result: &AssessmentResult, recipient: &str) -> Result<OutgoingMail> {
        let results_url = format!(
            "{}/results?response_id={}",
            self.public_base_url,
            urlencoding::encode(&result.response_id)
        );

        Ok(OutgoingMail {
            to: recipient.to_string(),
            subject: render::subject(result),
            html: render::summary_html(result, &self.questionnaire, &results_url)?,
            text: None,
        })
    }

    /// Send the summary for `result` to `recipient`
    ///
    /// Returns whether delivery succeeded. Never retries.
    pub async fn notify(&self, result: &AssessmentResult, recipient: &str) -> bool {
        if recipient.trim().is_empty() {
            error!(
                response_id = %result.response_id,
                "Notification skipped: no recipient address"
            );
            return false;
        }

        let mail = match self.compose(result, recipient) {
            Ok(mail) => mail,
            Err(e) => {
                error!(
                    response_id = %result.response_id,
                    error = %e,
                    "Notification email could not be rendered"
                );
                return false;
            }
        };

        match self.transport.deliver(&mail).await {
            Ok(()) => {
                info!(
                    response_id = %result.response_id,
                    recipient = %recipient,
                    transport = self.transport.name(),
                    "Notification email sent"
                );
                true
            }
            Err(e) => {
                error!(
                    response_id = %result.response_id,
                    recipient = %recipient,
                    transport = self.transport.name(),
                    error = %e,
                    "Notification email failed"
                );
                false
            }
        }
    }

    /// Send the canned configuration test message
    pub async fn send_test(&self, recipient: &str) -> Result<()> {
        let mail = OutgoingMail {
            to: recipient.to_string(),
            subject: "Assessment email configuration test".to_string(),
            html: "<p>This is a test email to verify the assessment email configuration.</p>"
                .to_string(),
            text: Some(
                "This is a test email to verify the assessment email configuration.".to_string(),
            ),
        };

        self.transport.deliver(&mail).await?;
        info!(recipient = %recipient, transport = self.transport.name(), "Test email sent");
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! In-memory transports for unit tests

    use super::*;
    use assessment_common::Error;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct RecordingTransport {
        pub sent: Mutex<Vec<OutgoingMail>>,
    }

    #[async_trait]
    impl MailTransport for RecordingTransport {
        fn name(&self) -> &'static str {
            "recording"
        }

        async fn deliver(&self, mail: &OutgoingMail) -> Result<()> {
            self.sent.lock().unwrap().push(mail.clone());
            Ok(())
        }
    }

    pub struct FailingTransport;

    #[async_trait]
    impl MailTransport for FailingTransport {
        fn name(&self) -> &'static str {
            "failing"
        }

        async fn deliver(&self, _mail: &OutgoingMail) -> Result<()> {
            Err(Error::Http("provider rejected the message".to_string()))
        }
    }
}
