//! vigil-core — shared domain types for the Vigil health agent.
//!
//! Defines the probe/verdict/alert data model, the report wire format,
//! and input validation for monitoring runs.
//!
//! # Failure model
//!
//! Input validation is the only fatal error category: anything rejected by
//! [`validate`] fails the invocation before a single network call is made.
//! Transport failures and semantic failures (wrong status, blown latency
//! budget) are expected outcomes of this domain and live inside the data
//! model as fields, never as raised errors.

pub mod error;
pub mod types;
pub mod validate;

pub use error::{ValidationError, ValidationResult};
pub use types::*;
