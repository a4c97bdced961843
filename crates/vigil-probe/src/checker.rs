//! Single-attempt probe logic.
//!
//! Performs one classified HTTP call with method fallback: the preferred
//! method first, then the other supported method when the first fails at
//! the transport level. Some servers reject HEAD outright, so GET is kept
//! as a backstop without the caller having to guess the right method. A
//! received response, healthy or not, never triggers fallback.

use std::time::{Duration, Instant};

use chrono::Utc;
use tracing::{debug, warn};
use url::Url;

use vigil_core::{ProbeAttempt, ProbeMethod};

/// Hard per-method timeout, measured from just before the call.
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(10);

/// Issues single classified probe attempts against an endpoint.
#[derive(Debug, Clone)]
pub struct Prober {
    client: reqwest::Client,
}

impl Prober {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    /// Use a preconfigured client (connection pool sharing, proxies).
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Perform exactly one classified attempt against `url`.
    ///
    /// Transport failures on the preferred method fall through to the
    /// alternate method; if both fail, a synthetic attempt is returned with
    /// status 0 and the configured budget standing in for the latency
    /// (flagged via `latency_estimated`).
    pub async fn probe_once(
        &self,
        url: &Url,
        preferred: ProbeMethod,
        expected_status: u16,
        max_latency_ms: u64,
    ) -> ProbeAttempt {
        let mut last_error: Option<String> = None;

        for method in preferred.ordered() {
            let request = match method {
                ProbeMethod::Head => self.client.head(url.clone()),
                ProbeMethod::Get => self.client.get(url.clone()),
            };

            let started = Instant::now();
            match tokio::time::timeout(PROBE_TIMEOUT, request.send()).await {
                Ok(Ok(response)) => {
                    let latency_ms = started.elapsed().as_millis() as u64;
                    return classify(
                        response.status().as_u16(),
                        method,
                        latency_ms,
                        expected_status,
                        max_latency_ms,
                    );
                }
                Ok(Err(e)) => {
                    debug!(%url, %method, error = %e, "probe transport failure");
                    last_error = Some(e.to_string());
                }
                Err(_) => {
                    debug!(%url, %method, "probe timed out");
                    last_error = Some(format!(
                        "probe timed out after {}s",
                        PROBE_TIMEOUT.as_secs()
                    ));
                }
            }
        }

        warn!(
            %url,
            method = %preferred,
            error = last_error.as_deref().unwrap_or("unknown"),
            "probe fallback methods exhausted"
        );

        ProbeAttempt {
            status: 0,
            method: preferred,
            latency_ms: max_latency_ms,
            latency_estimated: true,
            ok: false,
            within_latency_budget: false,
            expected_status_met: false,
            error_message: last_error,
            completed_at: Utc::now(),
        }
    }
}

impl Default for Prober {
    fn default() -> Self {
        Self::new()
    }
}

/// Classify a received response into a probe attempt.
///
/// `expected_status_met` accepts an exact match, or any 2xx when the
/// expected status is the default 200. `ok` additionally requires the
/// response itself to be successful and the latency budget to hold.
fn classify(
    status: u16,
    method: ProbeMethod,
    latency_ms: u64,
    expected_status: u16,
    max_latency_ms: u64,
) -> ProbeAttempt {
    let within_latency_budget = latency_ms <= max_latency_ms;
    let expected_status_met = status == expected_status
        || (expected_status == 200 && (200..300).contains(&status));
    let success = (200..300).contains(&status);
    let ok = success && expected_status_met && within_latency_budget;

    ProbeAttempt {
        status,
        method,
        latency_ms,
        latency_estimated: false,
        ok,
        within_latency_budget,
        expected_status_met,
        error_message: (!ok)
            .then(|| format!("response failed health check with status {status}")),
        completed_at: Utc::now(),
    }
}
