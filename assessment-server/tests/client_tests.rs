//! Results client against a live server on an ephemeral port

use std::sync::Arc;
use std::time::Duration;

use assessment_common::config::{AppConfig, ConfigOverrides, TomlConfig};
use assessment_common::db::{connect_in_memory, ResultStore};
use assessment_common::scoring::ScoringResult;
use assessment_common::typeform::Identity;
use assessment_common::{AssessmentResult, Error, Recommendations, Result};
use assessment_server::client::{PollPolicy, ResultsClient};
use assessment_server::notify::{MailTransport, NotificationQueue, Notifier, OutgoingMail};
use assessment_server::{build_router, AppState};
use async_trait::async_trait;

struct NullTransport;

#[async_trait]
impl MailTransport for NullTransport {
    fn name(&self) -> &'static str {
        "null"
    }

    async fn deliver(&self, _mail: &OutgoingMail) -> Result<()> {
        Ok(())
    }
}

/// Serve the router on 127.0.0.1:0; returns the base URL and the store
async fn spawn_server() -> (String, ResultStore) {
    let config = AppConfig::resolve(ConfigOverrides::default(), TomlConfig::default()).unwrap();
    let store = ResultStore::new(connect_in_memory().await.unwrap());
    let notifier = Notifier::new(Arc::new(NullTransport), config.questionnaire.clone(), "");
    let (notifications, _worker) = NotificationQueue::spawn(notifier.clone(), 4);
    let app = build_router(AppState::new(store.clone(), notifier, notifications, config));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}", addr), store)
}

fn result(id: &str) -> AssessmentResult {
    AssessmentResult::new(
        id,
        ScoringResult::from_dimension_scores(vec![80.0, 60.0, 40.0], vec![80.0, 60.0, 40.0]),
        Recommendations::default(),
        Identity {
            user_name: "Sam".to_string(),
            user_email: "sam@example.com".to_string(),
        },
    )
}

fn fast_policy(max_attempts: u32) -> PollPolicy {
    PollPolicy {
        max_attempts,
        delay: Duration::from_millis(20),
    }
}

#[tokio::test]
async fn test_fetch_found_and_missing() {
    let (base_url, store) = spawn_server().await;
    store.upsert(&result("c-1")).await.unwrap();

    let client = ResultsClient::new(&base_url).unwrap();

    let found = client.fetch("c-1").await.unwrap().expect("Should find result");
    assert_eq!(found.response_id, "c-1");
    assert_eq!(found.user_name, "Sam");
    assert_eq!(found.dimension_scores, vec![80.0, 60.0, 40.0]);
    assert!(found.created_at.is_some());

    assert!(client.fetch("c-missing").await.unwrap().is_none());
}

#[tokio::test]
async fn test_wait_for_exhausts_to_not_found() {
    let (base_url, _store) = spawn_server().await;
    let client = ResultsClient::with_policy(&base_url, fast_policy(3)).unwrap();

    let started = std::time::Instant::now();
    let outcome = client.wait_for("never").await;

    assert!(matches!(outcome, Err(Error::NotFound(_))));
    // Two delays between three attempts
    assert!(started.elapsed() >= Duration::from_millis(40));
}

#[tokio::test]
async fn test_wait_for_picks_up_late_write() {
    let (base_url, store) = spawn_server().await;
    let client = ResultsClient::with_policy(&base_url, fast_policy(50)).unwrap();

    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        store.upsert(&result("late")).await.unwrap();
    });

    let found = client.wait_for("late").await.unwrap();
    assert_eq!(found.response_id, "late");
}

#[tokio::test]
async fn test_unreachable_server_reports_last_error() {
    // Bind then drop to get a port with nothing listening
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = ResultsClient::with_policy(format!("http://{}", addr), fast_policy(2)).unwrap();

    assert!(matches!(client.wait_for("x").await, Err(Error::Http(_))));
}
