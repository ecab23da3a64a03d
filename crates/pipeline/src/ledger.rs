//! In-memory run ledger (status store).
//!
//! The ledger exclusively owns every [`Run`] record created during the
//! process lifetime. All mutation goes through its crate-private API
//! (called only by the orchestrator); readers get cloned snapshots, so
//! a dashboard polling [`RunLedger::list_runs`] can never observe a
//! half-written step record.
//!
//! Thread-safe via interior `RwLock`; designed to be wrapped in `Arc`
//! and shared between the orchestrator and the HTTP/CLI surfaces.

use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use autoreel_core::run::{Run, RunStatus, StepMeta, StepRecord, StepStatus, Trigger};

use crate::error::PipelineError;

/// Terminal outcome of one step invocation, as recorded by the ledger.
#[derive(Debug)]
pub enum StepOutcome {
    /// The step finished and produced this meta payload.
    Success(StepMeta),
    /// The step failed with this message.
    Failure(String),
}

/// Registry of run records, queryable while a run is in flight.
pub struct RunLedger {
    /// Runs in insertion order (which equals chronological order,
    /// since at most one run is created at a time).
    runs: RwLock<Vec<Run>>,
    /// When set, terminal runs beyond the newest N are evicted as new
    /// runs begin. `None` means unbounded growth.
    retain_last: Option<usize>,
}

impl RunLedger {
    /// Create an unbounded ledger.
    pub fn new() -> Self {
        Self {
            runs: RwLock::new(Vec::new()),
            retain_last: None,
        }
    }

    /// Create a ledger that keeps at most `cap` runs, evicting the
    /// oldest terminal runs first. Active runs are never evicted.
    pub fn with_retention(cap: usize) -> Self {
        Self {
            runs: RwLock::new(Vec::new()),
            retain_last: Some(cap.max(1)),
        }
    }

    // -----------------------------------------------------------------
    // Read API
    // -----------------------------------------------------------------

    /// Snapshot of all runs, most recent first.
    pub async fn list_runs(&self) -> Vec<Run> {
        let runs = self.runs.read().await;
        runs.iter().rev().cloned().collect()
    }

    /// Snapshot of a single run by id.
    pub async fn get_run(&self, id: Uuid) -> Option<Run> {
        let runs = self.runs.read().await;
        runs.iter().find(|r| r.id == id).cloned()
    }

    /// The run currently in flight, if any.
    pub async fn active_run(&self) -> Option<Run> {
        let runs = self.runs.read().await;
        runs.iter().find(|r| r.status.is_active()).cloned()
    }

    // -----------------------------------------------------------------
    // Mutation API — orchestrator only
    // -----------------------------------------------------------------

    /// Atomically enforce single-flight and register a new pending run.
    ///
    /// The check and the insert happen under one write lock, so two
    /// near-simultaneous triggers can never both create a run.
    pub(crate) async fn begin_run(
        &self,
        trigger: Trigger,
        topic: Option<String>,
    ) -> Result<Run, PipelineError> {
        let mut runs = self.runs.write().await;

        if let Some(active) = runs.iter().find(|r| r.status.is_active()) {
            return Err(PipelineError::ConcurrentRun {
                active_run_id: active.id,
            });
        }

        if let Some(cap) = self.retain_last {
            // Make room for the new run: drop oldest terminal entries.
            while runs.len() >= cap {
                let Some(oldest_terminal) = runs.iter().position(|r| r.status.is_terminal())
                else {
                    break;
                };
                let evicted = runs.remove(oldest_terminal);
                tracing::debug!(run_id = %evicted.id, "Evicted run past retention cap");
            }
        }

        let run = Run::new(trigger, topic);
        runs.push(run.clone());
        Ok(run)
    }

    /// Transition a pending run to `running`.
    pub(crate) async fn mark_running(&self, id: Uuid) -> Result<(), PipelineError> {
        let mut runs = self.runs.write().await;
        let run = find_mutable(&mut runs, id)?;
        run.status = RunStatus::Running;
        Ok(())
    }

    /// Append a step record in `running` state, stamped now.
    pub(crate) async fn append_step(&self, id: Uuid, name: &str) -> Result<(), PipelineError> {
        let mut runs = self.runs.write().await;
        let run = find_mutable(&mut runs, id)?;
        run.steps.push(StepRecord::started(name, Utc::now()));
        Ok(())
    }

    /// Record the outcome of the step most recently appended.
    ///
    /// On success, well-known meta keys are lifted into the run's
    /// result fields in the same critical section, so readers see the
    /// step record and the lifted fields change together.
    pub(crate) async fn update_step(
        &self,
        id: Uuid,
        outcome: StepOutcome,
    ) -> Result<(), PipelineError> {
        let mut runs = self.runs.write().await;
        let run = find_mutable(&mut runs, id)?;

        let Some(record) = run.steps.last_mut() else {
            tracing::warn!(run_id = %id, "update_step called with no step records");
            return Ok(());
        };

        record.completed_at = Some(Utc::now());
        match outcome {
            StepOutcome::Success(meta) => {
                record.status = StepStatus::Success;
                record.meta = meta;
                let meta = record.meta.clone();
                run.absorb_meta(&meta);
            }
            StepOutcome::Failure(message) => {
                record.status = StepStatus::Error;
                record.error = Some(message);
            }
        }
        Ok(())
    }

    /// Move a run to its terminal status and stamp `completed_at`.
    pub(crate) async fn finalize_run(
        &self,
        id: Uuid,
        status: RunStatus,
    ) -> Result<Run, PipelineError> {
        debug_assert!(status.is_terminal(), "finalize_run requires a terminal status");

        let mut runs = self.runs.write().await;
        let run = find_mutable(&mut runs, id)?;
        run.status = status;
        run.completed_at = Some(Utc::now());
        Ok(run.clone())
    }
}

impl Default for RunLedger {
    fn default() -> Self {
        Self::new()
    }
}

/// Locate a run for mutation, rejecting terminal runs.
fn find_mutable(runs: &mut [Run], id: Uuid) -> Result<&mut Run, PipelineError> {
    let run = runs
        .iter_mut()
        .find(|r| r.id == id)
        .ok_or(PipelineError::UnknownRun { run_id: id })?;

    if run.status.is_terminal() {
        return Err(PipelineError::TerminalRun { run_id: id });
    }
    Ok(run)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
