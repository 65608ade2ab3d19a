//! Background notification worker
//!
//! Handlers enqueue a job and return immediately; a single spawned task
//! delivers jobs in arrival order. Each job carries a oneshot sender for the
//! delivery outcome, which callers may await or drop.

use assessment_common::{AssessmentResult, Error, Result};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::Notifier;

/// Default queue depth
pub const DEFAULT_QUEUE_CAPACITY: usize = 64;

struct NotificationJob {
    result: AssessmentResult,
    recipient: String,
    done: oneshot::Sender<bool>,
}

/// Handle for submitting notification jobs
#[derive(Clone)]
pub struct NotificationQueue {
    tx: mpsc::Sender<NotificationJob>,
}

impl NotificationQueue {
    /// Start the worker task
    ///
    /// The task ends once every queue handle has been dropped.
    pub fn spawn(notifier: Notifier, capacity: usize) -> (Self, JoinHandle<()>) {
        let (tx, mut rx) = mpsc::channel::<NotificationJob>(capacity.max(1));

        let handle = tokio::spawn(async move {
            info!(transport = notifier.transport_name(), "Notification worker started");

            while let Some(job) = rx.recv().await {
                let delivered = notifier.notify(&job.result, &job.recipient).await;
                if job.done.send(delivered).is_err() {
                    debug!(
                        response_id = %job.result.response_id,
                        "Notification outcome not awaited"
                    );
                }
            }

            info!("Notification worker stopped");
        });

        (Self { tx }, handle)
    }

    /// Queue a summary of `result` for `recipient`
    ///
    /// The receiver resolves to the delivery outcome.
    pub async fn enqueue(
        &self,
        result: AssessmentResult,
        recipient: impl Into<String>,
    ) -> Result<oneshot::Receiver<bool>> {
        let (done, outcome) = oneshot::channel();
        let response_id = result.response_id.clone();

        self.tx
            .send(NotificationJob {
                result,
                recipient: recipient.into(),
                done,
            })
            .await
            .map_err(|_| {
                warn!(response_id = %response_id, "Notification worker is not running");
                Error::Internal("Notification worker is not running".to_string())
            })?;

        debug!(response_id = %response_id, "Notification queued");
        Ok(outcome)
    }

    /// Queue without waiting for room
    ///
    /// Fails immediately when the queue is full or the worker has stopped;
    /// request handlers use this so a slow mail provider never holds a response.
    pub fn try_enqueue(
        &self,
        result: AssessmentResult,
        recipient: impl Into<String>,
    ) -> Result<oneshot::Receiver<bool>> {
        let (done, outcome) = oneshot::channel();
        let response_id = result.response_id.clone();

        self.tx
            .try_send(NotificationJob {
                result,
                recipient: recipient.into(),
                done,
            })
            .map_err(|e| {
                let reason = match e {
                    mpsc::error::TrySendError::Full(_) => "Notification queue is full",
                    mpsc::error::TrySendError::Closed(_) => "Notification worker is not running",
                };
                warn!(response_id = %response_id, "{}, notification dropped", reason);
                Error::Internal(reason.to_string())
            })?;

        debug!(response_id = %response_id, "Notification queued");
        Ok(outcome)
    }
}
