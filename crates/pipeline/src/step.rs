//! The step contract every pipeline stage implements.

use autoreel_core::run::{MetaValue, Run, StepMeta};

/// Failure reported by a step implementation.
///
/// The orchestrator treats every step error uniformly: it records the
/// message on the step record, finalizes the run as `error`, and never
/// retries. If a step wants to retry a flaky call, it does so
/// internally before reporting.
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct StepError(pub String);

impl StepError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Read-only view of the run handed to each step invocation.
///
/// Carries the topic hint plus everything upstream steps produced so
/// far. Steps look up prior outputs in `outputs` by meta key.
#[derive(Debug, Clone, Default)]
pub struct StepContext {
    /// Topic hint fixed at run creation, if any.
    pub topic: Option<String>,
    /// Video title, once the script step has produced one.
    pub video_title: Option<String>,
    /// Merged meta of all previously completed steps.
    pub outputs: StepMeta,
}

impl StepContext {
    /// Build the initial context for a run (no upstream outputs yet).
    pub fn for_run(run: &Run) -> Self {
        Self {
            topic: run.topic.clone(),
            video_title: None,
            outputs: StepMeta::new(),
        }
    }

    /// Fold a completed step's meta into the accumulated context.
    pub fn absorb(&mut self, meta: &StepMeta) {
        if let Some(title) = meta
            .get(autoreel_core::run::META_VIDEO_TITLE)
            .and_then(MetaValue::as_str)
        {
            self.video_title = Some(title.to_string());
        }
        self.outputs
            .extend(meta.iter().map(|(k, v)| (k.clone(), v.clone())));
    }

    /// Convenience lookup of a string output from an upstream step.
    pub fn output_str(&self, key: &str) -> Option<&str> {
        self.outputs.get(key).and_then(MetaValue::as_str)
    }
}

/// A named unit of work in the pipeline.
///
/// Implementations may call external services and block on I/O; the
/// orchestrator awaits them one at a time. The built-in pipeline is
/// script → render → upload, but the orchestrator only ever iterates
/// the injected list, so tests substitute fakes freely.
#[async_trait::async_trait]
pub trait Step: Send + Sync {
    /// Stable identifier recorded on the step record (e.g. `"render"`).
    fn name(&self) -> &str;

    /// Perform the work. On success, return the meta payload to record;
    /// well-known keys (`videoTitle`, `publishedUrl`) are lifted into
    /// the run's result fields by the ledger.
    async fn execute(&self, ctx: &StepContext) -> Result<StepMeta, StepError>;
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
