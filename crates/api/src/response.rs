//! Response envelope types for API handlers.
//!
//! Shapes mirror what the dashboard expects: trigger endpoints return
//! `{ ok, runId, ... }`, the status endpoint returns `{ runs }`.

use serde::Serialize;
use uuid::Uuid;

use autoreel_core::run::Run;

/// Response of the manual trigger endpoint: the finalized run plus its
/// id for quick reference.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TriggerResponse {
    pub ok: bool,
    pub run_id: Uuid,
    pub run: Run,
}

/// Response of the cron trigger endpoint.
///
/// `run_id` is absent when the trigger was skipped because another run
/// was active; `skipped` says so explicitly.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CronResponse {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run_id: Option<Uuid>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub skipped: bool,
}

/// Response of the status endpoint: all runs, most recent first.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub runs: Vec<Run>,
}
