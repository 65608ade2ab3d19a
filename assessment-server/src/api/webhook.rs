//! Typeform webhook receiver
//!
//! POST /webhook with the Typeform delivery body. The submission is scored,
//! stored and queued for reviewer notification; only a body without
//! `form_response` is rejected.

use assessment_common::scoring;
use assessment_common::typeform;
use assessment_common::AssessmentResult;
use axum::{
    body::Bytes,
    extract::{Query, State},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use crate::api::{results_page, see_other, wants_redirect};
use crate::error::{ApiError, ApiResult};
use crate::pipeline::{self, NotificationStatus};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct WebhookQuery {
    pub redirect: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WebhookResponse<'a> {
    success: bool,
    redirect_url: String,
    persisted: bool,
    degraded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    degraded_reason: Option<&'a str>,
    notification: NotificationStatus,
    #[serde(flatten)]
    result: &'a AssessmentResult,
}

/// POST /webhook
pub async fn receive_webhook(
    State(state): State<AppState>,
    Query(query): Query<WebhookQuery>,
    body: Bytes,
) -> ApiResult<Response> {
    let payload: Value = serde_json::from_slice(&body)
        .map_err(|e| ApiError::BadRequest(format!("Invalid JSON body: {}", e)))?;

    let form_response = payload
        .get("form_response")
        .filter(|v| !v.is_null())
        .ok_or_else(|| {
            warn!("Webhook body has no form_response");
            ApiError::BadRequest("Missing form_response in webhook payload".to_string())
        })?;

    // Read before, and independently of, the full parse
    let response_id = typeform::raw_token(form_response)
        .unwrap_or_else(|| pipeline::synthesize_response_id("webhook"));
    let identity = typeform::extract_identity(form_response);

    info!(response_id = %response_id, "Webhook submission received");

    let outcome = scoring::score(form_response, &state.config.questionnaire);
    let report = pipeline::run(&state, response_id, outcome, identity).await;

    if wants_redirect(query.redirect.as_deref()) {
        return Ok(see_other(&results_page(&report.result.response_id)));
    }

    let body = WebhookResponse {
        success: true,
        redirect_url: state.config.results_url(&report.result.response_id),
        persisted: report.persisted,
        degraded: report.degraded.is_some(),
        degraded_reason: report.degraded.as_deref(),
        notification: report.notification,
        result: &report.result,
    };

    Ok(Json(body).into_response())
}
