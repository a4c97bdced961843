//! Input validation for monitoring runs.
//!
//! Everything rejected here fails the invocation before a single network
//! call is made. Targets must be absolute HTTP(S) URLs; the webhook, when
//! present, must itself parse as an absolute URL.

use url::Url;

use crate::error::{ValidationError, ValidationResult};

/// Parse and validate the probe target.
///
/// Accepts absolute `http`/`https` URLs only; anything else is rejected
/// with a message naming the offending input.
pub fn parse_target_url(raw: &str) -> ValidationResult<Url> {
    let url =
        Url::parse(raw).map_err(|_| ValidationError::InvalidTargetUrl(raw.to_string()))?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ValidationError::UnsupportedScheme(other.to_string())),
    }
}

/// Parse and validate the alert webhook target.
pub fn parse_webhook_url(raw: &str) -> ValidationResult<Url> {
    Url::parse(raw).map_err(|_| ValidationError::InvalidWebhookUrl(raw.to_string()))
}

/// Expected status must be a real HTTP status code.
pub fn validate_expected_status(status: u16) -> ValidationResult<()> {
    if (100..=599).contains(&status) {
        Ok(())
    } else {
        Err(ValidationError::ExpectedStatusOutOfRange(status))
    }
}

/// Latency budget must be positive.
pub fn validate_latency_budget(max_latency_ms: u64) -> ValidationResult<()> {
    if max_latency_ms == 0 {
        return Err(ValidationError::NonPositiveLatencyBudget);
    }
    Ok(())
}
