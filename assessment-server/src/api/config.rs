//! Configuration diagnostics: presence report and test email

use assessment_common::config::AppConfig;
use axum::{extract::State, Json};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::error;

use crate::error::{ApiError, ApiResult};
use crate::AppState;

/// Which settings are configured; never the values themselves
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigReport {
    pub sendgrid_api_key: bool,
    pub sender_email: bool,
    pub interviewer_email: bool,
    pub test_email: bool,
    pub public_base_url: String,
    pub dimensions: usize,
    pub mail_transport: &'static str,
}

impl ConfigReport {
    pub fn new(config: &AppConfig, mail_transport: &'static str) -> Self {
        Self {
            sendgrid_api_key: config.email.sendgrid_api_key.is_some(),
            sender_email: config.email.sender_email.is_some(),
            interviewer_email: config.email.interviewer_email.is_some(),
            test_email: config.email.test_email.is_some(),
            public_base_url: config.public_base_url.clone(),
            dimensions: config.questionnaire.dimension_count(),
            mail_transport,
        }
    }
}

/// GET /check-config
pub async fn check_config(State(state): State<AppState>) -> Json<ConfigReport> {
    Json(ConfigReport::new(
        &state.config,
        state.notifier.transport_name(),
    ))
}

/// GET /test-email
pub async fn send_test_email(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    let recipient = state
        .config
        .email
        .test_recipient()
        .ok_or_else(|| ApiError::BadRequest("No test or reviewer email configured".to_string()))?
        .to_string();

    if let Err(e) = state.notifier.send_test(&recipient).await {
        error!(recipient = %recipient, error = %e, "Test email failed");
        return Err(ApiError::Internal(format!("Test email failed: {}", e)));
    }

    Ok(Json(json!({
        "success": true,
        "message": "Test email sent successfully",
        "sentTo": recipient,
    })))
}
