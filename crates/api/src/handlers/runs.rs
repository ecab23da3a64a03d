//! Handlers for pipeline triggers and run queries.
//!
//! Both trigger handlers await the full pipeline, so the response
//! carries the finalized run — callers are expected to tolerate
//! long-lived requests (the dashboard polls `/status` meanwhile).

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use autoreel_core::error::CoreError;
use autoreel_core::run::{RunStatus, Trigger};
use autoreel_core::topic::validate_topic;
use autoreel_pipeline::{PipelineError, RunRequest};

use crate::error::{AppError, AppResult};
use crate::response::{CronResponse, StatusResponse, TriggerResponse};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Manual trigger
// ---------------------------------------------------------------------------

/// Request body of the manual trigger endpoint.
#[derive(Debug, Deserialize)]
pub struct TriggerBody {
    /// Optional topic hint, 3–160 characters when present.
    #[serde(default)]
    pub topic: Option<String>,
}

/// POST /api/v1/trigger
///
/// Start a manual run and wait for it to finish. Returns 409 with code
/// `CONCURRENT_RUN` if another run is active, 400 on an invalid topic.
pub async fn trigger_run(
    State(state): State<AppState>,
    Json(body): Json<TriggerBody>,
) -> AppResult<impl IntoResponse> {
    validate_topic(body.topic.as_deref())?;

    let run = state
        .orchestrator
        .start(RunRequest::new(Trigger::Manual, body.topic))
        .await?;

    tracing::info!(run_id = %run.id, status = ?run.status, "Manual run finished");

    Ok(Json(TriggerResponse {
        ok: run.status == RunStatus::Success,
        run_id: run.id,
        run,
    }))
}

// ---------------------------------------------------------------------------
// Cron trigger
// ---------------------------------------------------------------------------

/// GET /api/v1/cron/run
///
/// Start a scheduled run. If another run is active, this is NOT an
/// error: the scheduler gets 200 with `skipped: true` and tries again
/// at the next tick (skip-and-log policy, no queueing).
pub async fn cron_run(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let result = state
        .orchestrator
        .start(RunRequest::new(Trigger::Cron, None))
        .await;

    match result {
        Ok(run) => {
            tracing::info!(run_id = %run.id, status = ?run.status, "Cron run finished");
            Ok(Json(CronResponse {
                ok: run.status == RunStatus::Success,
                run_id: Some(run.id),
                skipped: false,
            }))
        }
        Err(PipelineError::ConcurrentRun { active_run_id }) => {
            tracing::info!(%active_run_id, "Cron trigger skipped, another run is active");
            Ok(Json(CronResponse {
                ok: false,
                run_id: None,
                skipped: true,
            }))
        }
        Err(other) => Err(AppError::Pipeline(other)),
    }
}

// ---------------------------------------------------------------------------
// Status queries
// ---------------------------------------------------------------------------

/// GET /api/v1/status
///
/// All runs, most recent first. Safe to poll while a run is in flight.
pub async fn list_runs(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let runs = state.ledger.list_runs().await;
    Ok(Json(StatusResponse { runs }))
}

/// GET /api/v1/runs/{id}
///
/// A single run by id, or 404.
pub async fn get_run(
    State(state): State<AppState>,
    Path(run_id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let run = state
        .ledger
        .get_run(run_id)
        .await
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Run",
            id: run_id,
        }))?;

    Ok(Json(run))
}
