//! Run and step records — the wire contract shared by the pipeline,
//! the HTTP API, and the CLI.
//!
//! Serialization is stable by design: camelCase field names, lowercase
//! enum tokens, RFC 3339 timestamps, and unset optionals omitted. The
//! dashboard and any external poller parse exactly this shape.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Well-known meta keys
// ---------------------------------------------------------------------------

/// Meta key lifted into [`Run::video_title`] when a step reports it.
pub const META_VIDEO_TITLE: &str = "videoTitle";

/// Meta key lifted into [`Run::published_url`] when a step reports it.
pub const META_PUBLISHED_URL: &str = "publishedUrl";

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Origin of a run. Pure provenance — it never changes orchestration
/// behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trigger {
    Cron,
    Manual,
    Cli,
}

impl std::fmt::Display for Trigger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let token = match self {
            Trigger::Cron => "cron",
            Trigger::Manual => "manual",
            Trigger::Cli => "cli",
        };
        f.write_str(token)
    }
}

/// Lifecycle status of a whole run: `pending → running → {success | error}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    Pending,
    Running,
    Success,
    Error,
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let token = match self {
            RunStatus::Pending => "pending",
            RunStatus::Running => "running",
            RunStatus::Success => "success",
            RunStatus::Error => "error",
        };
        f.write_str(token)
    }
}

impl RunStatus {
    /// A terminal run never mutates again.
    pub fn is_terminal(self) -> bool {
        matches!(self, RunStatus::Success | RunStatus::Error)
    }

    /// An active run blocks new triggers (single-flight).
    pub fn is_active(self) -> bool {
        matches!(self, RunStatus::Pending | RunStatus::Running)
    }
}

/// Lifecycle status of a single step record. Independent per record,
/// same monotone shape as [`RunStatus`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    Pending,
    Running,
    Success,
    Error,
}

// ---------------------------------------------------------------------------
// Meta values
// ---------------------------------------------------------------------------

/// Scalar diagnostic value attached to a step's meta map.
///
/// A closed set of variants keeps serialization deterministic; steps
/// cannot smuggle arbitrary nested structures into the status record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetaValue {
    Bool(bool),
    Number(f64),
    Timestamp(DateTime<Utc>),
    String(String),
}

impl MetaValue {
    /// String payload, if this value is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            MetaValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Numeric payload, if this value is a number.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            MetaValue::Number(n) => Some(*n),
            _ => None,
        }
    }
}

impl From<&str> for MetaValue {
    fn from(value: &str) -> Self {
        MetaValue::String(value.to_string())
    }
}

impl From<String> for MetaValue {
    fn from(value: String) -> Self {
        MetaValue::String(value)
    }
}

impl From<f64> for MetaValue {
    fn from(value: f64) -> Self {
        MetaValue::Number(value)
    }
}

impl From<bool> for MetaValue {
    fn from(value: bool) -> Self {
        MetaValue::Bool(value)
    }
}

/// Free-form (but scalar-valued) diagnostic payload of a step.
pub type StepMeta = BTreeMap<String, MetaValue>;

// ---------------------------------------------------------------------------
// StepRecord
// ---------------------------------------------------------------------------

/// One stage of a run, as recorded in the ledger.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepRecord {
    /// Stable step identifier, e.g. `"script"`, `"render"`, `"upload"`.
    pub name: String,

    /// Current status of this record.
    pub status: StepStatus,

    /// When execution of this step began.
    pub started_at: DateTime<Utc>,

    /// When the step reached a terminal status.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,

    /// Human-readable failure description. Set only when `status` is
    /// [`StepStatus::Error`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Diagnostic payload reported by the step implementation.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub meta: StepMeta,
}

impl StepRecord {
    /// Create a record for a step that is starting right now.
    pub fn started(name: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            name: name.into(),
            status: StepStatus::Running,
            started_at: now,
            completed_at: None,
            error: None,
            meta: BTreeMap::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Run
// ---------------------------------------------------------------------------

/// One end-to-end execution of the pipeline for a single trigger event.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Run {
    /// Opaque unique identifier, assigned at creation.
    pub id: Uuid,

    /// What initiated this run.
    pub trigger: Trigger,

    /// Optional free-text topic hint, fixed at creation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,

    /// Current lifecycle status.
    pub status: RunStatus,

    /// When the run was created.
    pub started_at: DateTime<Utc>,

    /// When the run reached a terminal status.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,

    /// Title of the produced video, lifted from step meta.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_title: Option<String>,

    /// Public URL of the published video, lifted from step meta.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_url: Option<String>,

    /// Step records in execution order. Append-only while running.
    pub steps: Vec<StepRecord>,
}

impl Run {
    /// Create a fresh pending run.
    pub fn new(trigger: Trigger, topic: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            trigger,
            topic,
            status: RunStatus::Pending,
            started_at: Utc::now(),
            completed_at: None,
            video_title: None,
            published_url: None,
            steps: Vec::new(),
        }
    }

    /// Lift well-known result keys out of a step's meta into the run's
    /// top-level result fields.
    pub fn absorb_meta(&mut self, meta: &StepMeta) {
        if let Some(title) = meta.get(META_VIDEO_TITLE).and_then(MetaValue::as_str) {
            self.video_title = Some(title.to_string());
        }
        if let Some(url) = meta.get(META_PUBLISHED_URL).and_then(MetaValue::as_str) {
            self.published_url = Some(url.to_string());
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
