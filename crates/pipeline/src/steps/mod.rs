//! Built-in pipeline steps: script → render → upload.
//!
//! Each step is thin domain glue over an external HTTP service. The
//! orchestration core knows nothing about these — it only iterates the
//! list returned by [`default_steps`].

mod render;
mod script;
mod upload;

pub use render::RenderStep;
pub use script::ScriptStep;
pub use upload::UploadStep;

use std::sync::Arc;

use reqwest::Client;

use crate::config::PipelineConfig;
use crate::step::{Step, StepError};

/// Build the canonical production step list.
///
/// A single `reqwest::Client` is shared across steps for connection
/// reuse.
pub fn default_steps(config: &PipelineConfig) -> Vec<Arc<dyn Step>> {
    let client = Client::builder()
        .timeout(config.request_timeout())
        .build()
        .expect("Failed to build HTTP client");

    vec![
        Arc::new(ScriptStep::new(client.clone(), config.clone())),
        Arc::new(RenderStep::new(client.clone(), config.clone())),
        Arc::new(UploadStep::new(client, config.clone())),
    ]
}

/// Attach the configured bearer token, if any.
fn authorized(
    request: reqwest::RequestBuilder,
    config: &PipelineConfig,
) -> reqwest::RequestBuilder {
    match &config.api_key {
        Some(key) => request.bearer_auth(key),
        None => request,
    }
}

/// Convert a transport-level failure into a step error.
fn transport_error(service: &str, err: reqwest::Error) -> StepError {
    StepError::new(format!("{service} request failed: {err}"))
}

/// Reject non-2xx responses with a descriptive step error.
async fn ensure_success(
    service: &str,
    response: reqwest::Response,
) -> Result<reqwest::Response, StepError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let detail = body.chars().take(200).collect::<String>();
    Err(StepError::new(format!(
        "{service} returned {status}: {detail}"
    )))
}
