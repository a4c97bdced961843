//! One-shot invocation orchestration.
//!
//! Validates input, drives the monitor, conditionally dispatches the alert
//! webhook, and assembles the structured report returned to the caller.
//! Only input validation can fail the invocation; every downstream failure
//! is absorbed into the report, so a run either rejects before the first
//! network call or completes with a full verdict.

use tracing::info;
use uuid::Uuid;

use vigil_core::{
    CheckReport, HealthSummary, ProbeMethod, RunContext, ValidationError, validate,
};

use crate::alert::{AlertDispatcher, AlertPayload};
use crate::monitor::Monitor;

/// Default status code considered healthy.
pub const DEFAULT_EXPECTED_STATUS: u16 = 200;

/// Default latency budget in milliseconds.
pub const DEFAULT_MAX_LATENCY_MS: u64 = 1_000;

/// Raw, unvalidated input for one monitoring run.
#[derive(Debug, Clone)]
pub struct CheckRequest {
    /// HTTP(S) endpoint to verify.
    pub url: String,
    pub method: ProbeMethod,
    pub expected_status: u16,
    pub max_latency_ms: u64,
    /// Webhook notified when the verdict is unhealthy.
    pub alert_webhook: Option<String>,
    /// Caller-supplied run identifier; generated when absent.
    pub run_id: Option<String>,
}

impl CheckRequest {
    /// A request for `url` with default method, status, and budget.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method: ProbeMethod::default(),
            expected_status: DEFAULT_EXPECTED_STATUS,
            max_latency_ms: DEFAULT_MAX_LATENCY_MS,
            alert_webhook: None,
            run_id: None,
        }
    }
}

/// Version string reported in the run context.
///
/// `VIGIL_AGENT_VERSION` overrides the crate version, so operators can tag
/// reports from patched or repackaged agents.
pub fn agent_version() -> String {
    std::env::var("VIGIL_AGENT_VERSION")
        .unwrap_or_else(|_| env!("CARGO_PKG_VERSION").to_string())
}

/// Execute one monitoring run end to end.
///
/// # Errors
/// Returns a [`ValidationError`] when the target URL, webhook URL, expected
/// status, or latency budget is rejected; no probing happens in that case.
pub async fn run_check(request: CheckRequest) -> Result<CheckReport, ValidationError> {
    let target = validate::parse_target_url(&request.url)?;
    validate::validate_expected_status(request.expected_status)?;
    validate::validate_latency_budget(request.max_latency_ms)?;
    let webhook = request
        .alert_webhook
        .as_deref()
        .map(validate::parse_webhook_url)
        .transpose()?;

    let run_id = request
        .run_id
        .clone()
        .unwrap_or_else(|| Uuid::new_v4().to_string());
    let agent_version = agent_version();

    info!(
        %run_id,
        url = %target,
        method = %request.method,
        expected_status = request.expected_status,
        max_latency_ms = request.max_latency_ms,
        "starting health check"
    );

    let verdict = Monitor::new()
        .run(
            &target,
            request.method,
            request.expected_status,
            request.max_latency_ms,
        )
        .await;

    let alert = match &webhook {
        Some(webhook) if !verdict.ok => Some(
            AlertDispatcher::new()
                .dispatch(
                    webhook,
                    &AlertPayload {
                        run_id: run_id.clone(),
                        agent_version: agent_version.clone(),
                        url: target.to_string(),
                        status: verdict.status,
                        expected_status: request.expected_status,
                        within_latency_budget: verdict.within_latency_budget,
                        latency_ms: verdict.latency_ms,
                        error_message: verdict.error_message.clone(),
                    },
                )
                .await,
        ),
        _ => None,
    };

    info!(
        %run_id,
        url = %target,
        ok = verdict.ok,
        status = verdict.status,
        latency_ms = verdict.latency_ms,
        within_latency_budget = verdict.within_latency_budget,
        expected_status_met = verdict.expected_status_met,
        alert_dispatched = alert.as_ref().is_some_and(|a| a.dispatched),
        "health check complete"
    );

    Ok(CheckReport {
        health: HealthSummary {
            url: target.to_string(),
            method: verdict.method,
            checked_at: verdict.completed_at,
            status: verdict.status,
            expected_status: request.expected_status,
            ok: verdict.ok,
            expected_status_met: verdict.expected_status_met,
            latency_ms: verdict.latency_ms,
            latency_estimated: verdict.latency_estimated,
            within_latency_budget: verdict.within_latency_budget,
            error_message: verdict.error_message,
        },
        alert,
        context: RunContext {
            run_id,
            agent_version,
        },
    })
}
