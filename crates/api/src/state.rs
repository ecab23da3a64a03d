use std::sync::Arc;

use autoreel_pipeline::{Orchestrator, RunLedger};

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via
/// `State<AppState>`.
///
/// Cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// The pipeline orchestrator; `start` is awaited for the full
    /// duration of a run.
    pub orchestrator: Arc<Orchestrator>,
    /// The run ledger, shared with the orchestrator, for status reads.
    pub ledger: Arc<RunLedger>,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
}
