//! Platform publishing step.

use reqwest::Client;
use serde::{Deserialize, Serialize};

use autoreel_core::run::{StepMeta, META_PUBLISHED_URL};

use crate::config::PipelineConfig;
use crate::step::{Step, StepContext, StepError};
use crate::steps::render::META_VIDEO_URL;
use crate::steps::{authorized, ensure_success, transport_error};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct UploadRequest<'a> {
    title: &'a str,
    video_url: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UploadResponse {
    published_url: String,
    platform_id: Option<String>,
}

/// Hands the rendered video to the publishing service and records the
/// public URL.
pub struct UploadStep {
    client: Client,
    config: PipelineConfig,
}

impl UploadStep {
    pub fn new(client: Client, config: PipelineConfig) -> Self {
        Self { client, config }
    }
}

#[async_trait::async_trait]
impl Step for UploadStep {
    fn name(&self) -> &str {
        "upload"
    }

    async fn execute(&self, ctx: &StepContext) -> Result<StepMeta, StepError> {
        let video_url = ctx
            .output_str(META_VIDEO_URL)
            .ok_or_else(|| StepError::new("no rendered video available from upstream step"))?;
        let title = ctx.video_title.as_deref().unwrap_or("Untitled");

        let request = authorized(
            self.client.post(&self.config.upload_api_url),
            &self.config,
        )
        .json(&UploadRequest { title, video_url });

        let response = request
            .send()
            .await
            .map_err(|e| transport_error("upload service", e))?;
        let response = ensure_success("upload service", response).await?;

        let payload: UploadResponse = response
            .json()
            .await
            .map_err(|e| transport_error("upload service", e))?;

        tracing::debug!(published_url = %payload.published_url, "Upload complete");

        let mut meta = StepMeta::new();
        meta.insert(META_PUBLISHED_URL.into(), payload.published_url.into());
        if let Some(platform_id) = payload.platform_id {
            meta.insert("platformId".into(), platform_id.into());
        }
        Ok(meta)
    }
}
