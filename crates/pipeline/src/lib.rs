//! Pipeline orchestration core.
//!
//! Executes an ordered list of heterogeneous [`step::Step`]s for one
//! run at a time, records every transition in the in-memory
//! [`ledger::RunLedger`], and converts step failures into a terminal
//! run outcome that stays queryable while later runs execute.
//!
//! Built-in steps (script → render → upload) live in [`steps`]; tests
//! and alternative deployments inject their own step lists instead.

pub mod config;
pub mod error;
pub mod ledger;
pub mod orchestrator;
pub mod step;
pub mod steps;

pub use error::PipelineError;
pub use ledger::RunLedger;
pub use orchestrator::{Orchestrator, RunRequest};
pub use step::{Step, StepContext, StepError};
