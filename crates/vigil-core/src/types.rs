//! Domain types for Vigil monitoring runs.
//!
//! These types describe the outcome of a single run: per-attempt probe
//! results, the aggregated verdict, the optional alert outcome, and the
//! report handed back to the caller. All wire-facing types serialize as
//! camelCase JSON.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

// ── Probe method ───────────────────────────────────────────────────

/// HTTP method used for a probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ProbeMethod {
    #[default]
    #[serde(rename = "HEAD")]
    Head,
    #[serde(rename = "GET")]
    Get,
}

impl ProbeMethod {
    /// The other supported method, tried when this one fails at the
    /// transport level.
    pub fn fallback(self) -> Self {
        match self {
            ProbeMethod::Head => ProbeMethod::Get,
            ProbeMethod::Get => ProbeMethod::Head,
        }
    }

    /// Ordered attempt list: the preferred method first, then its fallback.
    pub fn ordered(self) -> [Self; 2] {
        [self, self.fallback()]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ProbeMethod::Head => "HEAD",
            ProbeMethod::Get => "GET",
        }
    }
}

impl std::fmt::Display for ProbeMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ProbeMethod {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "HEAD" => Ok(ProbeMethod::Head),
            "GET" => Ok(ProbeMethod::Get),
            other => Err(ValidationError::UnsupportedMethod(other.to_string())),
        }
    }
}

// ── Probe attempt ──────────────────────────────────────────────────

/// Outcome of one classified HTTP call. Immutable once produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProbeAttempt {
    /// HTTP status code, 0 if the endpoint was unreachable.
    pub status: u16,
    /// Method that actually produced this outcome.
    pub method: ProbeMethod,
    /// Wall-clock time from request start to response or error.
    pub latency_ms: u64,
    /// True when `latency_ms` is the configured budget standing in for a
    /// measurement — every method failed at the transport level and nothing
    /// was actually timed.
    pub latency_estimated: bool,
    pub ok: bool,
    pub within_latency_budget: bool,
    pub expected_status_met: bool,
    /// Present iff the attempt could not be classified as healthy.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    /// Instant the attempt completed.
    pub completed_at: DateTime<Utc>,
}

// ── Health verdict ─────────────────────────────────────────────────

/// Aggregate of all probe attempts in one monitoring run.
///
/// Aggregation is pessimistic: a single lucky probe must not mask
/// intermittent failures or latency spikes, so health flags fold with AND
/// and latency folds with MAX.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthVerdict {
    /// Status of the last attempt.
    pub status: u16,
    /// Method of the last attempt.
    pub method: ProbeMethod,
    /// Worst-case latency across attempts.
    pub latency_ms: u64,
    /// True if any contributing attempt carried a sentinel latency.
    pub latency_estimated: bool,
    /// AND across attempts.
    pub ok: bool,
    /// AND across attempts.
    pub within_latency_budget: bool,
    /// AND across attempts.
    pub expected_status_met: bool,
    /// First failing attempt's message, or a generic fallback.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    /// Completion instant of the last attempt.
    pub completed_at: DateTime<Utc>,
}

impl HealthVerdict {
    /// Fold a run's attempts into one verdict.
    ///
    /// `attempts` must be non-empty; the monitor always produces a fixed
    /// number of attempts before folding.
    pub fn from_attempts(attempts: &[ProbeAttempt]) -> Self {
        let last = attempts.last().expect("at least one probe attempt");

        let ok = attempts.iter().all(|a| a.ok);
        let error_message = if ok {
            None
        } else {
            attempts
                .iter()
                .find(|a| !a.ok)
                .and_then(|a| a.error_message.clone())
                .or_else(|| Some("one or more probe attempts failed".to_string()))
        };

        Self {
            status: last.status,
            method: last.method,
            latency_ms: attempts.iter().map(|a| a.latency_ms).max().unwrap_or(0),
            latency_estimated: attempts.iter().any(|a| a.latency_estimated),
            ok,
            within_latency_budget: attempts.iter().all(|a| a.within_latency_budget),
            expected_status_met: attempts.iter().all(|a| a.expected_status_met),
            error_message,
            completed_at: last.completed_at,
        }
    }
}

// ── Alert outcome ──────────────────────────────────────────────────

/// Result of the one-shot alert webhook dispatch.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertOutcome {
    /// True iff the webhook endpoint responded with a successful status.
    pub dispatched: bool,
    /// Target webhook URL.
    pub webhook: String,
    /// Status received from the webhook; absent on transport failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    pub message: String,
}

// ── Check report ───────────────────────────────────────────────────

/// Per-run health summary in the report wire format.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthSummary {
    pub url: String,
    pub method: ProbeMethod,
    pub checked_at: DateTime<Utc>,
    pub status: u16,
    pub expected_status: u16,
    pub ok: bool,
    pub expected_status_met: bool,
    pub latency_ms: u64,
    pub latency_estimated: bool,
    pub within_latency_budget: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

/// Run context echoed back with every report.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunContext {
    pub run_id: String,
    pub agent_version: String,
}

/// Structured report returned to the caller for every completed run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckReport {
    pub health: HealthSummary,
    /// Present only if alert dispatch was attempted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alert: Option<AlertOutcome>,
    pub context: RunContext,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attempt(ok: bool, latency_ms: u64) -> ProbeAttempt {
        ProbeAttempt {
            status: if ok { 200 } else { 500 },
            method: ProbeMethod::Head,
            latency_ms,
            latency_estimated: false,
            ok,
            within_latency_budget: true,
            expected_status_met: ok,
            error_message: (!ok)
                .then(|| "response failed health check with status 500".to_string()),
            completed_at: Utc::now(),
        }
    }

    #[test]
    fn method_fallback_is_the_other_method() {
        assert_eq!(ProbeMethod::Head.fallback(), ProbeMethod::Get);
        assert_eq!(ProbeMethod::Get.fallback(), ProbeMethod::Head);
    }

    #[test]
    fn method_ordered_puts_preferred_first() {
        assert_eq!(
            ProbeMethod::Head.ordered(),
            [ProbeMethod::Head, ProbeMethod::Get]
        );
        assert_eq!(
            ProbeMethod::Get.ordered(),
            [ProbeMethod::Get, ProbeMethod::Head]
        );
    }

    #[test]
    fn method_parses_case_insensitively() {
        assert_eq!("head".parse::<ProbeMethod>().unwrap(), ProbeMethod::Head);
        assert_eq!("GET".parse::<ProbeMethod>().unwrap(), ProbeMethod::Get);
        assert!("POST".parse::<ProbeMethod>().is_err());
    }

    #[test]
    fn method_serializes_upper_case() {
        assert_eq!(
            serde_json::to_string(&ProbeMethod::Head).unwrap(),
            "\"HEAD\""
        );
        assert_eq!(serde_json::to_string(&ProbeMethod::Get).unwrap(), "\"GET\"");
    }

    #[test]
    fn verdict_all_ok_when_every_attempt_ok() {
        let attempts = vec![attempt(true, 10), attempt(true, 12), attempt(true, 8)];
        let verdict = HealthVerdict::from_attempts(&attempts);
        assert!(verdict.ok);
        assert!(verdict.error_message.is_none());
    }

    #[test]
    fn verdict_flips_when_any_single_attempt_fails() {
        // AND semantics, not majority: one failure anywhere flips the verdict.
        for failing in 0..4 {
            let attempts: Vec<_> = (0..4).map(|i| attempt(i != failing, 10)).collect();
            let verdict = HealthVerdict::from_attempts(&attempts);
            assert!(!verdict.ok, "failing attempt {failing} must flip the verdict");
        }
    }

    #[test]
    fn verdict_latency_is_maximum_across_attempts() {
        let attempts = vec![attempt(true, 10), attempt(true, 140), attempt(true, 25)];
        let verdict = HealthVerdict::from_attempts(&attempts);
        assert_eq!(verdict.latency_ms, 140);
        for a in &attempts {
            assert!(verdict.latency_ms >= a.latency_ms);
        }
    }

    #[test]
    fn verdict_takes_last_attempt_status_and_method() {
        let mut attempts = vec![attempt(true, 10), attempt(true, 10)];
        attempts[1].status = 204;
        attempts[1].method = ProbeMethod::Get;
        let verdict = HealthVerdict::from_attempts(&attempts);
        assert_eq!(verdict.status, 204);
        assert_eq!(verdict.method, ProbeMethod::Get);
        assert_eq!(verdict.completed_at, attempts[1].completed_at);
    }

    #[test]
    fn verdict_carries_first_failure_message() {
        let mut attempts = vec![
            attempt(true, 10),
            attempt(false, 10),
            attempt(false, 10),
            attempt(true, 10),
        ];
        attempts[1].error_message = Some("first failure".to_string());
        attempts[2].error_message = Some("second failure".to_string());
        let verdict = HealthVerdict::from_attempts(&attempts);
        assert_eq!(verdict.error_message.as_deref(), Some("first failure"));
    }

    #[test]
    fn verdict_falls_back_to_generic_message() {
        let mut attempts = vec![attempt(false, 10)];
        attempts[0].error_message = None;
        let verdict = HealthVerdict::from_attempts(&attempts);
        assert_eq!(
            verdict.error_message.as_deref(),
            Some("one or more probe attempts failed")
        );
    }

    #[test]
    fn verdict_budget_flag_is_and_across_attempts() {
        let mut attempts = vec![attempt(true, 10), attempt(true, 10)];
        attempts[0].within_latency_budget = false;
        let verdict = HealthVerdict::from_attempts(&attempts);
        assert!(!verdict.within_latency_budget);
    }

    #[test]
    fn verdict_marks_estimated_latency_if_any_attempt_did() {
        let mut attempts = vec![attempt(true, 10), attempt(false, 1000)];
        attempts[1].latency_estimated = true;
        let verdict = HealthVerdict::from_attempts(&attempts);
        assert!(verdict.latency_estimated);
    }

    #[test]
    fn report_serializes_camel_case() {
        let verdict = HealthVerdict::from_attempts(&[attempt(true, 10)]);
        let report = CheckReport {
            health: HealthSummary {
                url: "https://api.example.com/health".to_string(),
                method: verdict.method,
                checked_at: verdict.completed_at,
                status: verdict.status,
                expected_status: 200,
                ok: verdict.ok,
                expected_status_met: verdict.expected_status_met,
                latency_ms: verdict.latency_ms,
                latency_estimated: verdict.latency_estimated,
                within_latency_budget: verdict.within_latency_budget,
                error_message: None,
            },
            alert: None,
            context: RunContext {
                run_id: "run-1".to_string(),
                agent_version: "0.1.0".to_string(),
            },
        };

        let json = serde_json::to_value(&report).unwrap();
        let health = json.get("health").unwrap();
        assert!(health.get("expectedStatusMet").is_some());
        assert!(health.get("withinLatencyBudget").is_some());
        assert!(health.get("latencyMs").is_some());
        // RFC 3339 timestamp.
        let checked_at = health.get("checkedAt").unwrap().as_str().unwrap();
        assert!(checked_at.contains('T'));
        // Absent optional fields are omitted, not null.
        assert!(health.get("errorMessage").is_none());
        assert!(json.get("alert").is_none());
        assert_eq!(
            json.pointer("/context/runId").unwrap().as_str().unwrap(),
            "run-1"
        );
    }
}
