//! Media render step.

use reqwest::Client;
use serde::{Deserialize, Serialize};

use autoreel_core::run::{MetaValue, StepMeta};

use crate::config::PipelineConfig;
use crate::step::{Step, StepContext, StepError};
use crate::steps::script::META_SCRIPT;
use crate::steps::{authorized, ensure_success, transport_error};

/// Meta key under which the rendered video URL is recorded.
pub const META_VIDEO_URL: &str = "videoUrl";

#[derive(Serialize)]
struct RenderRequest<'a> {
    title: Option<&'a str>,
    script: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RenderResponse {
    video_url: String,
    duration_secs: Option<f64>,
    file_size_bytes: Option<f64>,
}

/// Sends the narration script to the render service and records the
/// resulting video location plus render diagnostics.
pub struct RenderStep {
    client: Client,
    config: PipelineConfig,
}

impl RenderStep {
    pub fn new(client: Client, config: PipelineConfig) -> Self {
        Self { client, config }
    }
}

#[async_trait::async_trait]
impl Step for RenderStep {
    fn name(&self) -> &str {
        "render"
    }

    async fn execute(&self, ctx: &StepContext) -> Result<StepMeta, StepError> {
        let script = ctx
            .output_str(META_SCRIPT)
            .ok_or_else(|| StepError::new("no script available from upstream step"))?;

        let request = authorized(
            self.client.post(&self.config.render_api_url),
            &self.config,
        )
        .json(&RenderRequest {
            title: ctx.video_title.as_deref(),
            script,
        });

        let response = request
            .send()
            .await
            .map_err(|e| transport_error("render service", e))?;
        let response = ensure_success("render service", response).await?;

        let payload: RenderResponse = response
            .json()
            .await
            .map_err(|e| transport_error("render service", e))?;

        tracing::debug!(video_url = %payload.video_url, "Render complete");

        let mut meta = StepMeta::new();
        meta.insert(META_VIDEO_URL.into(), payload.video_url.into());
        if let Some(duration) = payload.duration_secs {
            meta.insert("durationSecs".into(), MetaValue::Number(duration));
        }
        if let Some(size) = payload.file_size_bytes {
            meta.insert("fileSizeBytes".into(), MetaValue::Number(size));
        }
        Ok(meta)
    }
}
