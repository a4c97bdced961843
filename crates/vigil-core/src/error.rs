//! Error types for Vigil input validation.

use thiserror::Error;

/// Result type alias for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Errors rejected synchronously, before any probing begins.
///
/// Unreachable targets and failed webhook deliveries are never represented
/// here; those are absorbed into [`crate::ProbeAttempt`] and
/// [`crate::AlertOutcome`] fields.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("invalid target url: {0}")]
    InvalidTargetUrl(String),

    #[error("unsupported target scheme: {0} (only http and https can be probed)")]
    UnsupportedScheme(String),

    #[error("invalid alert webhook url: {0}")]
    InvalidWebhookUrl(String),

    #[error("unsupported probe method: {0} (use HEAD or GET)")]
    UnsupportedMethod(String),

    #[error("expected status {0} out of range (must be 100-599)")]
    ExpectedStatusOutOfRange(u16),

    #[error("latency budget must be a positive number of milliseconds")]
    NonPositiveLatencyBudget,
}
