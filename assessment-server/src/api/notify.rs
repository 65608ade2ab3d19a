//! On-demand reviewer notification for a stored result

use assessment_common::Error;
use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};

use crate::api::{results_page, see_other, wants_redirect};
use crate::error::{ApiError, ApiResult};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct NotifyQuery {
    pub response_id: Option<String>,
    pub redirect: Option<String>,
}

/// GET /notify
///
/// Unlike the pipeline, waits for the delivery outcome and reports it.
pub async fn send_notification(
    State(state): State<AppState>,
    Query(query): Query<NotifyQuery>,
) -> ApiResult<Response> {
    let response_id = query
        .response_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ApiError::BadRequest("Missing response_id parameter".to_string()))?;

    let result = state
        .store
        .get_by_response_id(response_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Assessment result not found".to_string()))?
        .into_value();

    let recipient = state
        .config
        .email
        .interviewer_email
        .clone()
        .ok_or_else(|| Error::Config("Reviewer email address not configured".to_string()))?;

    info!(response_id = %response_id, recipient = %recipient, "Manual notification requested");

    let delivered = state
        .notifications
        .enqueue(result.clone(), recipient.clone())
        .await?
        .await
        .map_err(|_| ApiError::Internal("Notification worker dropped the job".to_string()))?;

    if !delivered {
        error!(response_id = %response_id, "Manual notification failed");
        return Err(ApiError::Internal(
            "Failed to send notification email".to_string(),
        ));
    }

    if wants_redirect(query.redirect.as_deref()) {
        return Ok(see_other(&results_page(&result.response_id)));
    }

    Ok(Json(json!({
        "success": true,
        "message": "Notification email sent successfully",
        "to": recipient,
        "assessmentInfo": {
            "responseId": result.response_id,
            "userName": result.user_name,
            "totalScore": result.total_score,
        },
    }))
    .into_response())
}
