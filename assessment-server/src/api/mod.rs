//! HTTP API handlers for assessment-server

pub mod config;
pub mod health;
pub mod notify;
pub mod process;
pub mod results;
pub mod webhook;

pub use config::{check_config, send_test_email};
pub use health::health_routes;
pub use notify::send_notification;
pub use process::process_submission;
pub use results::get_result;
pub use webhook::receive_webhook;

use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};

/// Path of the results page for a response
pub fn results_page(response_id: &str) -> String {
    format!("/results?response_id={}", urlencoding::encode(response_id))
}

/// 303 See Other to `location`
pub fn see_other(location: &str) -> Response {
    match HeaderValue::from_str(location) {
        Ok(value) => (StatusCode::SEE_OTHER, [(header::LOCATION, value)]).into_response(),
        Err(_) => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
    }
}

/// `redirect=true` query flag
pub fn wants_redirect(flag: Option<&str>) -> bool {
    matches!(flag, Some(v) if v.eq_ignore_ascii_case("true") || v == "1")
}
