//! Submission pipeline shared by `/webhook` and `/process`
//!
//! score → recommend → upsert → enqueue notification. Steps after scoring
//! never fail the request; their outcome is reported in `PipelineReport`.

use assessment_common::recommendations::recommend;
use assessment_common::scoring::ScoringResult;
use assessment_common::typeform::Identity;
use assessment_common::{AssessmentResult, Outcome};
use chrono::Utc;
use rand::Rng;
use serde::Serialize;
use tokio::sync::oneshot;
use tracing::{error, info, warn};

use crate::AppState;

/// What happened to the reviewer notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationStatus {
    /// Handed to the notification worker
    Queued,
    /// No reviewer address configured
    Skipped,
    /// Queue full or worker unavailable; the notification was dropped
    Failed,
}

/// Outcome of one pipeline run
#[derive(Debug)]
pub struct PipelineReport {
    pub result: AssessmentResult,
    pub persisted: bool,
    /// Why scoring fell back to defaults, if it did
    pub degraded: Option<String>,
    pub notification: NotificationStatus,
    /// Resolves to the delivery outcome when a notification was queued
    pub delivery: Option<oneshot::Receiver<bool>>,
}

/// Run the pipeline for one submission
pub async fn run(
    state: &AppState,
    response_id: String,
    scoring: Outcome<ScoringResult>,
    identity: Identity,
) -> PipelineReport {
    let (scoring, degraded) = scoring.into_parts();
    if let Some(reason) = &degraded {
        warn!(response_id = %response_id, reason = %reason, "Scoring degraded to defaults");
    }

    let recommendations = recommend(
        &scoring.mastery_level,
        &scoring.dimension_scores,
        &state.config.questionnaire,
    );
    let result = AssessmentResult::new(response_id, scoring, recommendations, identity);

    let (result, persisted) = match state.store.upsert(&result).await {
        Ok(stored) => {
            info!(
                response_id = %stored.response_id,
                total_score = stored.total_score,
                level = stored.mastery_level.level,
                "Assessment result stored"
            );
            (stored, true)
        }
        Err(e) => {
            error!(
                response_id = %result.response_id,
                error = %e,
                "Failed to store assessment result"
            );
            (result, false)
        }
    };

    let (notification, delivery) = match state.config.email.interviewer_email.as_deref() {
        None => {
            warn!(
                response_id = %result.response_id,
                "No reviewer address configured, notification skipped"
            );
            (NotificationStatus::Skipped, None)
        }
        Some(recipient) => match state.notifications.try_enqueue(result.clone(), recipient) {
            Ok(delivery) => (NotificationStatus::Queued, Some(delivery)),
            Err(e) => {
                error!(response_id = %result.response_id, error = %e, "Failed to queue notification");
                (NotificationStatus::Failed, None)
            }
        },
    };

    PipelineReport {
        result,
        persisted,
        degraded,
        notification,
        delivery,
    }
}

/// Response id for a submission that arrived without one
///
/// `{prefix}-{unix millis}-{random}`
pub fn synthesize_response_id(prefix: &str) -> String {
    let suffix: u32 = rand::thread_rng().gen_range(0..1_000_000);
    format!("{}-{}-{:06}", prefix, Utc::now().timestamp_millis(), suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_synthesized_id_format() {
        let id = synthesize_response_id("manual");
        let parts: Vec<&str> = id.split('-').collect();

        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "manual");
        assert!(parts[1].parse::<i64>().unwrap() > 0);
        assert_eq!(parts[2].len(), 6);
        assert!(parts[2].chars().all(|c| c.is_ascii_digit()));
    }
}
