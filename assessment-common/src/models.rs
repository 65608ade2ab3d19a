//! Assessment result model
//!
//! Serialized camelCase: this is the JSON contract of `GET /results/{id}` and
//! of the webhook response body.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::scoring::ScoringResult;
use crate::typeform::Identity;

/// Ordinal mastery classification derived from the total score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MasteryLevel {
    /// 1 (Basic) through 5 (Expert)
    pub level: u8,
    pub description: String,
    pub recommendations: String,
}

/// Development plan shown to the visitor
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendations {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub general_recommendations: Vec<String>,
    #[serde(default)]
    pub interview_preparation: Vec<String>,
}

/// The persisted assessment record, keyed by `response_id`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentResult {
    pub response_id: String,
    pub total_score: f64,
    pub mastery_level: MasteryLevel,
    pub dimension_scores: Vec<f64>,
    pub recommendations: Recommendations,
    #[serde(default)]
    pub raw_scores: Vec<f64>,
    #[serde(default)]
    pub user_name: String,
    #[serde(default)]
    pub user_email: String,
    /// Set by the result store on every write; None until persisted
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl AssessmentResult {
    /// Assemble an unsaved record from a scoring run
    ///
    /// Total score and mastery level come only from `scoring`, so they cannot
    /// disagree.
    pub fn new(
        response_id: impl Into<String>,
        scoring: ScoringResult,
        recommendations: Recommendations,
        identity: Identity,
    ) -> Self {
        Self {
            response_id: response_id.into(),
            total_score: scoring.total_score,
            mastery_level: scoring.mastery_level,
            dimension_scores: scoring.dimension_scores,
            recommendations,
            raw_scores: scoring.raw_scores,
            user_name: identity.user_name,
            user_email: identity.user_email,
            created_at: None,
        }
    }

    /// Total score rounded to one decimal place for display
    pub fn display_total(&self) -> f64 {
        crate::scoring::round1(self.total_score)
    }
}
