//! Assessment result store
//!
//! Upsert and fetch by response id. Structured fields are JSON text columns;
//! a column that no longer decodes falls back to a default and the read is
//! returned as `Outcome::Degraded` instead of failing.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use tracing::warn;

use crate::models::{AssessmentResult, MasteryLevel, Recommendations};
use crate::outcome::Outcome;
use crate::scoring::classify;
use crate::{Error, Result};

const SELECT_COLUMNS: &str = "response_id, total_score, mastery_level, dimension_scores, \
     recommendations, raw_scores, user_name, user_email, created_at";

/// Persistence adapter for `AssessmentResult`
#[derive(Clone)]
pub struct ResultStore {
    pool: SqlitePool,
}

impl ResultStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Insert or overwrite the record for `result.response_id`
    ///
    /// Last write wins: every column is replaced and `created_at` is reset to
    /// now. Returns the stored row.
    pub async fn upsert(&self, result: &AssessmentResult) -> Result<AssessmentResult> {
        let response_id = require_id(&result.response_id)?;

        // Prepare all data BEFORE acquiring a connection
        let mastery_level = serde_json::to_string(&result.mastery_level)?;
        let dimension_scores = serde_json::to_string(&result.dimension_scores)?;
        let recommendations = serde_json::to_string(&result.recommendations)?;
        let raw_scores = serde_json::to_string(&result.raw_scores)?;
        let created_at = Utc::now().to_rfc3339();

        let sql = format!(
            r#"
            INSERT INTO assessment_results (
                response_id, total_score, mastery_level, dimension_scores,
                recommendations, raw_scores, user_name, user_email, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(response_id) DO UPDATE SET
                total_score = excluded.total_score,
                mastery_level = excluded.mastery_level,
                dimension_scores = excluded.dimension_scores,
                recommendations = excluded.recommendations,
                raw_scores = excluded.raw_scores,
                user_name = excluded.user_name,
                user_email = excluded.user_email,
                created_at = excluded.created_at
            RETURNING {}
            "#,
            SELECT_COLUMNS
        );

        let row = sqlx::query(&sql)
            .bind(response_id)
            .bind(result.total_score)
            .bind(&mastery_level)
            .bind(&dimension_scores)
            .bind(&recommendations)
            .bind(&raw_scores)
            .bind(&result.user_name)
            .bind(&result.user_email)
            .bind(&created_at)
            .fetch_one(&self.pool)
            .await?;

        Ok(decode_row(&row)?.into_value())
    }

    /// Fetch the record for `response_id`
    ///
    /// `Ok(None)` means no record exists (yet); callers polling after a
    /// webhook should retry on it rather than treat it as a failure.
    pub async fn get_by_response_id(
        &self,
        response_id: &str,
    ) -> Result<Option<Outcome<AssessmentResult>>> {
        let response_id = require_id(response_id)?;

        let sql = format!(
            "SELECT {} FROM assessment_results WHERE response_id = ? ORDER BY created_at DESC LIMIT 1",
            SELECT_COLUMNS
        );

        let row = sqlx::query(&sql)
            .bind(response_id)
            .fetch_optional(&self.pool)
            .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let outcome = decode_row(&row)?;
        if let Some(reason) = outcome.reason() {
            warn!(response_id = %response_id, reason = %reason, "Stored assessment result decoded with defaults");
        }

        Ok(Some(outcome))
    }
}

/// Ids are stored and matched exactly as given; only blank ids are rejected
fn require_id(response_id: &str) -> Result<&str> {
    if response_id.trim().is_empty() {
        return Err(Error::InvalidInput("Response ID is required".to_string()));
    }
    Ok(response_id)
}

fn decode_row(row: &SqliteRow) -> Result<Outcome<AssessmentResult>> {
    let response_id: String = row.try_get("response_id")?;
    let total_score: f64 = row.try_get("total_score")?;
    let mut problems = Vec::new();

    let mastery_level: MasteryLevel = decode_json(
        row,
        "mastery_level",
        || classify(total_score),
        &mut problems,
    );
    let dimension_scores: Vec<f64> = decode_json(row, "dimension_scores", Vec::new, &mut problems);
    let recommendations: Recommendations =
        decode_json(row, "recommendations", Recommendations::default, &mut problems);
    let raw_scores: Vec<f64> = decode_json(row, "raw_scores", Vec::new, &mut problems);

    let created_at: String = row.try_get("created_at")?;
    let created_at = match DateTime::parse_from_rfc3339(&created_at) {
        Ok(dt) => Some(dt.with_timezone(&Utc)),
        Err(e) => {
            problems.push(format!("created_at: {}", e));
            None
        }
    };

    let result = AssessmentResult {
        response_id,
        total_score,
        mastery_level,
        dimension_scores,
        recommendations,
        raw_scores,
        user_name: row.try_get("user_name")?,
        user_email: row.try_get("user_email")?,
        created_at,
    };

    if problems.is_empty() {
        Ok(Outcome::Computed(result))
    } else {
        Ok(Outcome::degraded(result, problems.join("; ")))
    }
}

fn decode_json<T: DeserializeOwned>(
    row: &SqliteRow,
    column: &str,
    fallback: impl FnOnce() -> T,
    problems: &mut Vec<String>,
) -> T {
    let raw: Option<String> = match row.try_get(column) {
        Ok(raw) => raw,
        Err(e) => {
            problems.push(format!("{}: {}", column, e));
            return fallback();
        }
    };

    match raw.as_deref().map(|s| serde_json::from_str::<T>(s)) {
        Some(Ok(value)) => value,
        Some(Err(e)) => {
            problems.push(format!("{}: {}", column, e));
            fallback()
        }
        None => {
            problems.push(format!("{}: missing", column));
            fallback()
        }
    }
}
