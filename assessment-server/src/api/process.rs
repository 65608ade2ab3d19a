//! Manual submission entry point
//!
//! GET /process is the Typeform "redirect on completion" target. It carries
//! identity in the query string but no answers, so the stored result is the
//! flat default. The visitor always lands on the results page.

use assessment_common::scoring::ScoringResult;
use assessment_common::typeform::Identity;
use assessment_common::Outcome;
use axum::{
    extract::{Query, State},
    response::Response,
};
use serde::Deserialize;
use tracing::info;

use crate::api::{results_page, see_other};
use crate::pipeline;
use crate::AppState;

/// Display name used when the query carries none
pub const ANONYMOUS_USER: &str = "Anonymous User";

#[derive(Debug, Default, Deserialize)]
pub struct ProcessQuery {
    pub response_id: Option<String>,
    #[serde(rename = "form_response.token")]
    pub form_response_token: Option<String>,
    pub token: Option<String>,
    pub name: Option<String>,
    pub user_name: Option<String>,
    pub email: Option<String>,
    pub user_email: Option<String>,
}

impl ProcessQuery {
    /// First non-blank id candidate
    pub fn response_id(&self) -> Option<String> {
        first_set([&self.response_id, &self.form_response_token, &self.token])
    }

    pub fn identity(&self) -> Identity {
        Identity {
            user_name: first_set([&self.name, &self.user_name])
                .unwrap_or_else(|| ANONYMOUS_USER.to_string()),
            user_email: first_set([&self.email, &self.user_email]).unwrap_or_default(),
        }
    }
}

fn first_set<const N: usize>(candidates: [&Option<String>; N]) -> Option<String> {
    candidates
        .into_iter()
        .flatten()
        .map(|v| v.trim())
        .find(|v| !v.is_empty())
        .map(str::to_string)
}

/// GET /process
pub async fn process_submission(
    State(state): State<AppState>,
    Query(query): Query<ProcessQuery>,
) -> Response {
    let response_id = query
        .response_id()
        .unwrap_or_else(|| pipeline::synthesize_response_id("manual"));
    let identity = query.identity();

    info!(
        response_id = %response_id,
        user_name = %identity.user_name,
        "Manual submission received"
    );

    let outcome = Outcome::degraded(
        ScoringResult::fallback(state.config.questionnaire.dimension_count()),
        "manual submission carries no answers",
    );
    let report = pipeline::run(&state, response_id, outcome, identity).await;

    see_other(&results_page(&report.result.response_id))
}
