use uuid::Uuid;

/// Errors surfaced by the orchestrator and the ledger mutation API.
///
/// Step failures are NOT represented here — they become run state
/// (`status = error` plus the failing step's message) and the run is
/// still returned to the caller.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Another run is active; the caller should skip and retry later.
    #[error("Another run is already active: {active_run_id}")]
    ConcurrentRun { active_run_id: Uuid },

    /// Attempted to mutate a run that already reached a terminal
    /// status. Programming-invariant violation, not a pipeline outcome.
    #[error("Run {run_id} is terminal and can no longer be mutated")]
    TerminalRun { run_id: Uuid },

    /// The ledger has no run with this id.
    #[error("Unknown run: {run_id}")]
    UnknownRun { run_id: Uuid },
}
