//! Push-notification fan-out.
//!
//! [`PushFanout`] subscribes to the [`EventBus`](crate::bus::EventBus) and
//! hands every [`GameEvent`] to [`PushDelivery`], which POSTs it as JSON to
//! a webhook. A failed delivery is retried with exponential backoff
//! (1 s, 2 s, 4 s) and then dropped with an error log.

use std::time::Duration;

use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

use crate::bus::GameEvent;

/// Delays before each retry (exponential backoff: 1s, 2s, 4s).
const RETRY_DELAYS: [Duration; 3] = [
    Duration::from_secs(1),
    Duration::from_secs(2),
    Duration::from_secs(4),
];

/// HTTP request timeout for a single delivery attempt.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum PushError {
    /// The underlying HTTP request failed (network, DNS, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The remote server returned a non-2xx status code.
    #[error("Push endpoint returned HTTP {0}")]
    HttpStatus(u16),
}

// ---------------------------------------------------------------------------
// PushDelivery
// ---------------------------------------------------------------------------

/// Delivers game events to a push webhook.
pub struct PushDelivery {
    client: reqwest::Client,
    url: String,
    retry_delays: Vec<Duration>,
}

impl PushDelivery {
    pub fn new(url: impl Into<String>) -> Result<Self, PushError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            url: url.into(),
            retry_delays: RETRY_DELAYS.to_vec(),
        })
    }

    /// Override the backoff schedule. One retry per entry.
    pub fn with_retry_delays(mut self, delays: Vec<Duration>) -> Self {
        self.retry_delays = delays;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// POST an event, retrying after each configured delay.
    ///
    /// Returns the last error once every retry has failed.
    pub async fn deliver(&self, event: &GameEvent) -> Result<(), PushError> {
        let payload = serde_json::json!({
            "event_type": event.event_type,
            "user_id": event.user_id,
            "title": event.title,
            "body": event.body,
            "payload": event.payload,
            "timestamp": event.timestamp,
        });

        let mut result = self.try_send(&payload).await;
        for (retry, delay) in self.retry_delays.iter().enumerate() {
            let Err(e) = &result else {
                break;
            };
            tracing::warn!(
                attempt = retry + 1,
                url = %self.url,
                error = %e,
                "Push delivery attempt failed, retrying"
            );
            tokio::time::sleep(*delay).await;
            result = self.try_send(&payload).await;
        }

        if let Err(e) = &result {
            tracing::error!(
                url = %self.url,
                event_type = %event.event_type,
                error = %e,
                "Push delivery failed after all retries"
            );
        }
        result
    }

    async fn try_send(&self, payload: &serde_json::Value) -> Result<(), PushError> {
        let response = self.client.post(&self.url).json(payload).send().await?;
        if !response.status().is_success() {
            return Err(PushError::HttpStatus(response.status().as_u16()));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// PushFanout
// ---------------------------------------------------------------------------

/// Background subscriber forwarding bus events to [`PushDelivery`].
pub struct PushFanout;

impl PushFanout {
    /// Run until `cancel` fires or the bus is dropped.
    ///
    /// Deliveries run one at a time; a lagging receiver skips events rather
    /// than blocking publishers. Cancellation also interrupts a delivery
    /// that is still retrying.
    pub async fn run(
        delivery: PushDelivery,
        mut receiver: broadcast::Receiver<GameEvent>,
        cancel: CancellationToken,
    ) {
        tracing::info!(url = %delivery.url(), "Push fan-out started");
        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("Push fan-out stopping");
                    break;
                }
                received = receiver.recv() => match received {
                    Ok(event) => {
                        tokio::select! {
                            _ = cancel.cancelled() => {
                                tracing::info!(
                                    event_type = %event.event_type,
                                    "Push fan-out stopping, delivery abandoned"
                                );
                                break;
                            }
                            // Errors are already logged by `deliver`.
                            _ = delivery.deliver(&event) => {}
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        tracing::warn!(skipped = n, "Push fan-out lagged, some events were not delivered");
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        tracing::info!("Event bus closed, push fan-out shutting down");
                        break;
                    }
                },
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
