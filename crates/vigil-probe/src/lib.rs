//! vigil-probe — the Vigil health probe engine.
//!
//! Probes a single HTTP(S) endpoint with method fallback, aggregates a
//! fixed number of spaced attempts into one pessimistic verdict, and
//! dispatches a one-shot alert webhook when the verdict is unhealthy.
//!
//! # Architecture
//!
//! ```text
//! run_check()
//!   ├── input validation (vigil-core) — the only fatal failure
//!   ├── Monitor
//!   │   ├── 4 × Prober::probe_once() → ProbeAttempt
//!   │   │     └── transport-level fallback: preferred method, then HEAD↔GET
//!   │   └── HealthVerdict::from_attempts() — AND over flags, MAX over latency
//!   ├── AlertDispatcher::dispatch() — iff unhealthy and a webhook was given
//!   └── CheckReport { health, alert?, context }
//! ```
//!
//! Attempts within a run execute strictly sequentially so the fixed
//! inter-probe spacing holds and the worst observed latency stays a
//! measurement taken under consistent load. Runs share no mutable state;
//! concurrent runs need no coordination.

pub mod alert;
pub mod checker;
pub mod monitor;
pub mod runner;

pub use alert::{AlertDispatcher, AlertPayload};
pub use checker::Prober;
pub use monitor::Monitor;
pub use runner::{CheckRequest, run_check};
