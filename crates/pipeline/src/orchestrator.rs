//! Sequences pipeline steps for one run and writes every transition
//! through the ledger.
//!
//! The orchestrator owns no run state of its own: the ledger is the
//! single source of truth, and the orchestrator mutates it through the
//! crate-private API while holding only a run id.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use autoreel_core::run::{Run, RunStatus, Trigger};

use crate::error::PipelineError;
use crate::ledger::{RunLedger, StepOutcome};
use crate::step::{Step, StepContext, StepError};

/// Message recorded on the in-flight step when a run is cancelled.
const CANCELLED_MESSAGE: &str = "step cancelled before completion";

/// A request to start one pipeline run.
#[derive(Debug, Clone)]
pub struct RunRequest {
    /// Provenance of the trigger (cron, manual, cli).
    pub trigger: Trigger,
    /// Optional topic hint, already validated at the trigger boundary.
    pub topic: Option<String>,
}

impl RunRequest {
    pub fn new(trigger: Trigger, topic: Option<String>) -> Self {
        Self { trigger, topic }
    }
}

/// Executes the injected step list sequentially, one run at a time.
pub struct Orchestrator {
    ledger: Arc<RunLedger>,
    steps: Vec<Arc<dyn Step>>,
}

impl Orchestrator {
    /// Create an orchestrator over a shared ledger and an ordered step
    /// list. The list is fixed for the orchestrator's lifetime.
    pub fn new(ledger: Arc<RunLedger>, steps: Vec<Arc<dyn Step>>) -> Self {
        Self { ledger, steps }
    }

    /// The ledger this orchestrator writes through.
    pub fn ledger(&self) -> &Arc<RunLedger> {
        &self.ledger
    }

    /// Execute one full run.
    ///
    /// Returns `Err(ConcurrentRun)` if another run is active — callers
    /// should treat that as "skip, retry later", not as a defect. A
    /// step failure is NOT an `Err`: the finalized run comes back with
    /// `status = error`, the failing step's message recorded, and all
    /// previously succeeded steps intact.
    pub async fn start(&self, request: RunRequest) -> Result<Run, PipelineError> {
        self.start_with_cancellation(request, CancellationToken::new())
            .await
    }

    /// Like [`start`](Self::start), but aborts between/within steps
    /// when `cancel` fires. The in-flight step is marked as failed with
    /// a cancellation message and the run finalizes as `error` through
    /// the ordinary failure path.
    pub async fn start_with_cancellation(
        &self,
        request: RunRequest,
        cancel: CancellationToken,
    ) -> Result<Run, PipelineError> {
        let run = self
            .ledger
            .begin_run(request.trigger, request.topic)
            .await?;
        let run_id = run.id;

        tracing::info!(
            run_id = %run_id,
            trigger = %request.trigger,
            step_count = self.steps.len(),
            "Pipeline run started",
        );

        self.ledger.mark_running(run_id).await?;

        let mut ctx = StepContext::for_run(&run);
        let mut failed = false;

        for step in &self.steps {
            let name = step.name();
            self.ledger.append_step(run_id, name).await?;

            let result = tokio::select! {
                _ = cancel.cancelled() => Err(StepError::new(CANCELLED_MESSAGE)),
                result = step.execute(&ctx) => result,
            };

            match result {
                Ok(meta) => {
                    tracing::info!(run_id = %run_id, step = name, "Step succeeded");
                    ctx.absorb(&meta);
                    self.ledger
                        .update_step(run_id, StepOutcome::Success(meta))
                        .await?;
                }
                Err(StepError(message)) => {
                    tracing::warn!(
                        run_id = %run_id,
                        step = name,
                        error = %message,
                        "Step failed, aborting remaining steps",
                    );
                    self.ledger
                        .update_step(run_id, StepOutcome::Failure(message))
                        .await?;
                    failed = true;
                    break;
                }
            }
        }

        let status = if failed {
            RunStatus::Error
        } else {
            RunStatus::Success
        };
        let finalized = self.ledger.finalize_run(run_id, status).await?;

        tracing::info!(
            run_id = %run_id,
            status = ?finalized.status,
            steps = finalized.steps.len(),
            "Pipeline run finished",
        );

        Ok(finalized)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
