//! Results client
//!
//! Fetches a stored result over HTTP, polling with a fixed delay while the
//! webhook that creates it may still be in flight.

use assessment_common::{AssessmentResult, Error, Result};
use reqwest::StatusCode;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Polling schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    /// Total attempts including the first
    pub max_attempts: u32,
    pub delay: Duration,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 6,
            delay: Duration::from_secs(3),
        }
    }
}

/// Client for `GET /results/{response_id}`
#[derive(Clone)]
pub struct ResultsClient {
    http_client: reqwest::Client,
    base_url: String,
    policy: PollPolicy,
}

impl ResultsClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Self::with_policy(base_url, PollPolicy::default())
    }

    pub fn with_policy(base_url: impl Into<String>, policy: PollPolicy) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| Error::Http(format!("HTTP client setup failed: {}", e)))?;

        Ok(Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            policy,
        })
    }

    /// Single fetch: `Ok(None)` when the result does not exist yet
    pub async fn fetch(&self, response_id: &str) -> Result<Option<AssessmentResult>> {
        let url = format!(
            "{}/results/{}",
            self.base_url,
            urlencoding::encode(response_id)
        );

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::Http(format!("GET {} failed: {}", url, e)))?;

        match response.status() {
            StatusCode::OK => {
                let result = response
                    .json::<AssessmentResult>()
                    .await
                    .map_err(|e| Error::Http(format!("Invalid result body: {}", e)))?;
                Ok(Some(result))
            }
            StatusCode::NOT_FOUND => Ok(None),
            status => {
                let error_text = response.text().await.unwrap_or_default();
                Err(Error::Http(format!(
                    "GET {} returned {}: {}",
                    url,
                    status.as_u16(),
                    error_text
                )))
            }
        }
    }

    /// Poll until the result exists or attempts run out
    ///
    /// Not-found and transport errors are both retried. Exhaustion yields
    /// `Error::NotFound`, or the last error if the final attempt failed.
    pub async fn wait_for(&self, response_id: &str) -> Result<AssessmentResult> {
        let attempts = self.policy.max_attempts.max(1);
        let mut last_error = None;

        for attempt in 1..=attempts {
            match self.fetch(response_id).await {
                Ok(Some(result)) => {
                    info!(response_id = %response_id, attempt, "Result available");
                    return Ok(result);
                }
                Ok(None) => {
                    debug!(response_id = %response_id, attempt, "Result not available yet");
                    last_error = None;
                }
                Err(e) => {
                    warn!(response_id = %response_id, attempt, error = %e, "Result fetch failed");
                    last_error = Some(e);
                }
            }

            if attempt < attempts {
                tokio::time::sleep(self.policy.delay).await;
            }
        }

        Err(last_error.unwrap_or_else(|| {
            Error::NotFound(format!(
                "Result {} not available after {} attempts",
                response_id, attempts
            ))
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy() {
        let policy = PollPolicy::default();
        assert_eq!(policy.max_attempts, 6);
        assert_eq!(policy.delay, Duration::from_secs(3));
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = ResultsClient::new("http://localhost:5780/").unwrap();
        assert_eq!(client.base_url, "http://localhost:5780");
    }
}
