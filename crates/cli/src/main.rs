//! Command-line pipeline runner.
//!
//! Usage: `autoreel [topic words...]` — all arguments are joined into
//! one optional topic hint. Exits 0 when the run succeeds, 1 when the
//! run fails or another run is already active.

use std::process::ExitCode;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use autoreel_core::run::{RunStatus, Trigger};
use autoreel_core::topic::validate_topic;
use autoreel_pipeline::config::PipelineConfig;
use autoreel_pipeline::steps::default_steps;
use autoreel_pipeline::{Orchestrator, PipelineError, RunLedger, RunRequest};

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "autoreel=info,autoreel_pipeline=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let topic = if args.is_empty() {
        None
    } else {
        Some(args.join(" "))
    };

    if let Err(e) = validate_topic(topic.as_deref()) {
        eprintln!("Invalid topic: {e}");
        return ExitCode::FAILURE;
    }

    let config = PipelineConfig::from_env();
    let ledger = Arc::new(RunLedger::new());
    let orchestrator = Orchestrator::new(Arc::clone(&ledger), default_steps(&config));

    match orchestrator
        .start(RunRequest::new(Trigger::Cli, topic))
        .await
    {
        Ok(run) => {
            println!("Pipeline finished: run {} -> {}", run.id, run.status);
            if let Some(url) = &run.published_url {
                println!("Published: {url}");
            }
            if run.status == RunStatus::Success {
                ExitCode::SUCCESS
            } else {
                if let Some(failed) = run.steps.iter().find(|s| s.error.is_some()) {
                    eprintln!(
                        "Step '{}' failed: {}",
                        failed.name,
                        failed.error.as_deref().unwrap_or("unknown error")
                    );
                }
                ExitCode::FAILURE
            }
        }
        Err(PipelineError::ConcurrentRun { active_run_id }) => {
            eprintln!("Another run is already active: {active_run_id}");
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("Pipeline error: {e}");
            ExitCode::FAILURE
        }
    }
}
