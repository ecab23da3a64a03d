//! HTTP surface for the autoreel pipeline.
//!
//! Exposes the cron trigger, the manual trigger, and the status/run
//! queries the dashboard polls. All orchestration lives in
//! `autoreel-pipeline`; this crate is framing only.

pub mod config;
pub mod error;
pub mod handlers;
pub mod response;
pub mod routes;
pub mod state;
