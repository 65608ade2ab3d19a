//! assessment-server library - HTTP surface of the self-assessment service
//!
//! Receives Typeform submissions, scores and stores them, notifies the
//! reviewer, and serves stored results back to the results page.

use assessment_common::config::AppConfig;
use assessment_common::db::ResultStore;
use axum::Router;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod cli;
pub mod client;
pub mod error;
pub mod notify;
pub mod pipeline;

pub use error::{ApiError, ApiResult};
use notify::{NotificationQueue, Notifier};

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub store: ResultStore,
    /// Direct sender, used where the caller needs the delivery error
    pub notifier: Notifier,
    /// Background delivery for pipeline notifications
    pub notifications: NotificationQueue,
    pub config: Arc<AppConfig>,
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(
        store: ResultStore,
        notifier: Notifier,
        notifications: NotificationQueue,
        config: AppConfig,
    ) -> Self {
        Self {
            store,
            notifier,
            notifications,
            config: Arc::new(config),
            startup_time: Utc::now(),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{get, post};

    Router::new()
        .route("/webhook", post(api::receive_webhook))
        .route("/results/:response_id", get(api::get_result))
        .route("/process", get(api::process_submission))
        .route("/notify", get(api::send_notification))
        .route("/test-email", get(api::send_test_email))
        .route("/check-config", get(api::check_config))
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        // Results page may be served from another origin
        .layer(CorsLayer::permissive())
        .with_state(state)
}
