//! Domain models and pure validation for the autoreel platform.
//!
//! This crate has zero internal dependencies and holds only the types
//! every other crate agrees on: the run/step records, their status
//! enums, and the trigger-boundary validation rules.

pub mod error;
pub mod run;
pub mod topic;
