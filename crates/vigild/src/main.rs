//! vigild — the Vigil health check agent.
//!
//! One-shot binary: runs a single bounded monitoring pass against an
//! HTTP(S) endpoint and prints the structured JSON report to stdout. An
//! unhealthy verdict is still a completed run — only input validation
//! fails the process.
//!
//! # Usage
//!
//! ```text
//! vigild check --url https://api.example.com/health --max-latency-ms 500 \
//!     --alert-webhook https://hooks.example.com/failure
//! ```

use clap::{Parser, Subcommand};

use vigil_core::ProbeMethod;
use vigil_probe::runner::{DEFAULT_EXPECTED_STATUS, DEFAULT_MAX_LATENCY_MS};
use vigil_probe::{CheckRequest, run_check};

#[derive(Parser)]
#[command(name = "vigild", about = "Vigil endpoint health agent", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Probe an endpoint and print the verdict report as JSON.
    Check {
        /// HTTP(S) endpoint to verify.
        #[arg(long)]
        url: String,

        /// Probe method (HEAD or GET).
        #[arg(long, default_value = "HEAD")]
        method: ProbeMethod,

        /// Status code considered healthy.
        #[arg(long, default_value_t = DEFAULT_EXPECTED_STATUS)]
        expected_status: u16,

        /// Latency budget in milliseconds.
        #[arg(long, default_value_t = DEFAULT_MAX_LATENCY_MS)]
        max_latency_ms: u64,

        /// Webhook notified when the check fails.
        #[arg(long)]
        alert_webhook: Option<String>,

        /// Run identifier; generated when omitted.
        #[arg(long)]
        run_id: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,vigild=debug,vigil_probe=debug".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Check {
            url,
            method,
            expected_status,
            max_latency_ms,
            alert_webhook,
            run_id,
        } => {
            let report = run_check(CheckRequest {
                url,
                method,
                expected_status,
                max_latency_ms,
                alert_webhook,
                run_id,
            })
            .await?;

            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(())
}
