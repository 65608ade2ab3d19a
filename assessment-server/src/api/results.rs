//! Stored result lookup

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::warn;

use crate::error::ApiResult;
use crate::AppState;

/// GET /results/:response_id
///
/// 404 carries `{"error": "Results not found"}`, the body the results page
/// keys its retry loop on.
pub async fn get_result(
    State(state): State<AppState>,
    Path(response_id): Path<String>,
) -> ApiResult<Response> {
    match state.store.get_by_response_id(&response_id).await? {
        Some(outcome) => {
            if let Some(reason) = outcome.reason() {
                warn!(response_id = %response_id, reason = %reason, "Serving degraded result");
            }
            Ok(Json(outcome.into_value()).into_response())
        }
        None => Ok((
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Results not found" })),
        )
            .into_response()),
    }
}
