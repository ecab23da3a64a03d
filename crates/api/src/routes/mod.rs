//! Route definitions.

pub mod health;

use axum::routing::{get, post};
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// All `/api/v1` routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/trigger", post(handlers::runs::trigger_run))
        .route("/cron/run", get(handlers::runs::cron_run))
        .route("/status", get(handlers::runs::list_runs))
        .route("/runs/{id}", get(handlers::runs::get_run))
}
