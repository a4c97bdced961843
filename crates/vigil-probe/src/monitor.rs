//! Multi-attempt monitoring and aggregation.
//!
//! Drives the prober for a fixed number of spaced attempts and folds the
//! results into one pessimistic verdict. Attempts run strictly in sequence;
//! the inter-attempt delay is pure idle time, never tied to I/O. Attempt
//! failures are captured inside each [`ProbeAttempt`], so a run never
//! raises and always produces a complete verdict.

use std::time::Duration;

use tracing::debug;
use url::Url;

use vigil_core::{HealthVerdict, ProbeMethod};

use crate::checker::Prober;

/// Probe attempts per monitoring run.
pub const PROBE_ATTEMPTS: usize = 4;

/// Idle delay between consecutive attempts (not applied after the last).
pub const PROBE_INTERVAL: Duration = Duration::from_millis(250);

/// Drives sequential probe attempts against a single endpoint.
#[derive(Debug, Clone)]
pub struct Monitor {
    prober: Prober,
}

impl Monitor {
    pub fn new() -> Self {
        Self {
            prober: Prober::new(),
        }
    }

    pub fn with_prober(prober: Prober) -> Self {
        Self { prober }
    }

    /// Run one bounded monitoring pass and fold it into a verdict.
    pub async fn run(
        &self,
        url: &Url,
        preferred: ProbeMethod,
        expected_status: u16,
        max_latency_ms: u64,
    ) -> HealthVerdict {
        let mut attempts = Vec::with_capacity(PROBE_ATTEMPTS);

        for attempt in 0..PROBE_ATTEMPTS {
            let result = self
                .prober
                .probe_once(url, preferred, expected_status, max_latency_ms)
                .await;

            debug!(
                %url,
                attempt,
                status = result.status,
                ok = result.ok,
                latency_ms = result.latency_ms,
                "probe attempt completed"
            );
            attempts.push(result);

            if attempt < PROBE_ATTEMPTS - 1 {
                tokio::time::sleep(PROBE_INTERVAL).await;
            }
        }

        HealthVerdict::from_attempts(&attempts)
    }
}

impl Default for Monitor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[tokio::test]
    async fn run_issues_exactly_four_attempts() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("HEAD", "/health")
            .with_status(200)
            .expect(4)
            .create_async()
            .await;

        let url = Url::parse(&format!("{}/health", server.url())).unwrap();
        let verdict = Monitor::new()
            .run(&url, ProbeMethod::Head, 200, 1000)
            .await;

        mock.assert_async().await;
        assert!(verdict.ok);
        assert_eq!(verdict.status, 200);
        assert_eq!(verdict.method, ProbeMethod::Head);
        assert!(verdict.error_message.is_none());
    }

    #[tokio::test]
    async fn run_spaces_attempts_by_the_fixed_interval() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("HEAD", "/health")
            .with_status(200)
            .expect(4)
            .create_async()
            .await;

        let url = Url::parse(&format!("{}/health", server.url())).unwrap();
        let started = Instant::now();
        Monitor::new().run(&url, ProbeMethod::Head, 200, 1000).await;

        // Three inter-attempt delays of 250 ms, plus request latency.
        assert!(started.elapsed() >= Duration::from_millis(750));
    }

    #[tokio::test]
    async fn run_against_failing_endpoint_is_unhealthy_with_message() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("HEAD", "/health")
            .with_status(500)
            .expect(4)
            .create_async()
            .await;

        let url = Url::parse(&format!("{}/health", server.url())).unwrap();
        let verdict = Monitor::new()
            .run(&url, ProbeMethod::Head, 200, 1000)
            .await;

        assert!(!verdict.ok);
        assert_eq!(verdict.status, 500);
        assert!(
            verdict
                .error_message
                .as_deref()
                .unwrap()
                .contains("500")
        );
    }

    #[tokio::test]
    async fn run_against_unreachable_endpoint_folds_sentinel_attempts() {
        let url = Url::parse("http://127.0.0.1:1/health").unwrap();
        let verdict = Monitor::new()
            .run(&url, ProbeMethod::Head, 200, 500)
            .await;

        assert!(!verdict.ok);
        assert_eq!(verdict.status, 0);
        assert_eq!(verdict.latency_ms, 500);
        assert!(verdict.latency_estimated);
        assert!(verdict.error_message.is_some());
    }
}
