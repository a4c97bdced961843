//! Alert webhook dispatch.
//!
//! Sends a single JSON POST to the caller-supplied webhook when a run's
//! verdict is unhealthy. Delivery is one-shot: no retries, bounded by a
//! hard timeout, and every outcome — delivered, rejected, or unreachable —
//! is recorded in the returned [`AlertOutcome`] rather than raised.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};
use url::Url;

use vigil_core::AlertOutcome;

/// Hard timeout for the webhook POST.
pub const ALERT_TIMEOUT: Duration = Duration::from_secs(5);

/// Event name carried in the webhook envelope.
const ALERT_EVENT: &str = "api.health.alert";

/// Failure details delivered to the webhook.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertPayload {
    pub run_id: String,
    pub agent_version: String,
    pub url: String,
    pub status: u16,
    pub expected_status: u16,
    pub within_latency_budget: bool,
    pub latency_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

/// Wire envelope for the webhook body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AlertEnvelope<'a> {
    event: &'static str,
    payload: &'a AlertPayload,
    dispatched_at: DateTime<Utc>,
}

/// Posts alert webhooks for unhealthy verdicts.
#[derive(Debug, Clone)]
pub struct AlertDispatcher {
    client: reqwest::Client,
}

impl AlertDispatcher {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Perform the one-shot webhook POST and classify the outcome.
    pub async fn dispatch(&self, webhook: &Url, payload: &AlertPayload) -> AlertOutcome {
        info!(%webhook, run_id = %payload.run_id, "dispatching alert webhook");

        let body = AlertEnvelope {
            event: ALERT_EVENT,
            payload,
            dispatched_at: Utc::now(),
        };

        let result = tokio::time::timeout(
            ALERT_TIMEOUT,
            self.client.post(webhook.clone()).json(&body).send(),
        )
        .await;

        let outcome = match result {
            Ok(Ok(response)) => {
                let status = response.status().as_u16();
                if response.status().is_success() {
                    AlertOutcome {
                        dispatched: true,
                        webhook: webhook.to_string(),
                        status: Some(status),
                        message: "alert webhook delivered".to_string(),
                    }
                } else {
                    AlertOutcome {
                        dispatched: false,
                        webhook: webhook.to_string(),
                        status: Some(status),
                        message: format!("webhook responded with status {status}"),
                    }
                }
            }
            Ok(Err(e)) => {
                warn!(%webhook, error = %e, "alert webhook dispatch failed");
                AlertOutcome {
                    dispatched: false,
                    webhook: webhook.to_string(),
                    status: None,
                    message: e.to_string(),
                }
            }
            Err(_) => {
                warn!(%webhook, "alert webhook dispatch timed out");
                AlertOutcome {
                    dispatched: false,
                    webhook: webhook.to_string(),
                    status: None,
                    message: format!(
                        "alert dispatch timed out after {}s",
                        ALERT_TIMEOUT.as_secs()
                    ),
                }
            }
        };

        info!(
            %webhook,
            dispatched = outcome.dispatched,
            "alert webhook attempt finished"
        );
        outcome
    }
}

impl Default for AlertDispatcher {
    fn default() -> Self {
        Self::new()
    }
}
