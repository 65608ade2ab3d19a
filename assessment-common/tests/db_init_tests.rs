//! Database initialization and scoring-to-storage pipeline tests

use assessment_common::db::{init_database, ResultStore};
use assessment_common::recommendations::recommend;
use assessment_common::scoring::score;
use assessment_common::typeform::FormResponse;
use assessment_common::{AssessmentResult, Questionnaire};
use serde_json::json;
use tempfile::TempDir;

#[tokio::test]
async fn test_database_creation_when_missing() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("nested").join("assessment.db");

    let pool = init_database(&db_path).await;
    assert!(pool.is_ok(), "Database initialization failed: {:?}", pool.err());
    assert!(db_path.exists(), "Database file was not created");
}

#[tokio::test]
async fn test_database_reopen_keeps_results() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("assessment.db");
    let q = Questionnaire::default();

    let payload = json!({
        "token": "tok-reopen",
        "answers": [
            { "type": "text", "field": { "id": "n" }, "text": "Robin" },
            { "type": "choice", "field": { "id": "q1" }, "choice": { "label": "Often" } },
            { "type": "number", "field": { "id": "q2" }, "number": 3 }
        ],
        "definition": { "fields": [{ "id": "n", "title": "Your name" }] }
    });

    let form = FormResponse::parse(&payload).unwrap();
    let scoring = score(&payload, &q).into_value();
    let recs = recommend(&scoring.mastery_level, &scoring.dimension_scores, &q);
    let result = AssessmentResult::new("tok-reopen", scoring, recs, form.identity());

    {
        let pool = init_database(&db_path).await.unwrap();
        ResultStore::new(pool.clone()).upsert(&result).await.unwrap();
        pool.close().await;
    }

    let pool = init_database(&db_path).await.unwrap();
    let read = ResultStore::new(pool)
        .get_by_response_id("tok-reopen")
        .await
        .unwrap()
        .expect("record should survive reopen")
        .into_value();

    assert_eq!(read.user_name, "Robin");
    assert_eq!(read.dimension_scores, result.dimension_scores);
    assert_eq!(read.raw_scores, vec![80.0, 60.0]);
    assert_eq!(read.dimension_scores[0], 70.0);
}

#[tokio::test]
async fn test_every_pooled_connection_gets_pragmas() {
    let dir = TempDir::new().unwrap();
    let pool = init_database(&dir.path().join("assessment.db")).await.unwrap();

    // Hold both so the second is a distinct connection
    let mut first = pool.acquire().await.unwrap();
    let mut second = pool.acquire().await.unwrap();

    for conn in [&mut first, &mut second] {
        let busy: i64 = sqlx::query_scalar("PRAGMA busy_timeout")
            .fetch_one(&mut **conn)
            .await
            .unwrap();
        assert_eq!(busy, 5000);

        let mode: String = sqlx::query_scalar("PRAGMA journal_mode")
            .fetch_one(&mut **conn)
            .await
            .unwrap();
        assert_eq!(mode.to_lowercase(), "wal");
    }
}
