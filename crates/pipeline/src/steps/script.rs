//! Script generation step.

use reqwest::Client;
use serde::{Deserialize, Serialize};

use autoreel_core::run::{MetaValue, StepMeta, META_VIDEO_TITLE};

use crate::config::PipelineConfig;
use crate::step::{Step, StepContext, StepError};
use crate::steps::{authorized, ensure_success, transport_error};

/// Meta key under which the full narration script is recorded, for
/// downstream steps and run inspection.
pub const META_SCRIPT: &str = "script";

#[derive(Serialize)]
struct ScriptRequest<'a> {
    topic: Option<&'a str>,
}

#[derive(Deserialize)]
struct ScriptResponse {
    title: String,
    script: String,
}

/// Calls the script-generation service and records the title and
/// narration text. A missing topic lets the service pick its own.
pub struct ScriptStep {
    client: Client,
    config: PipelineConfig,
}

impl ScriptStep {
    pub fn new(client: Client, config: PipelineConfig) -> Self {
        Self { client, config }
    }
}

#[async_trait::async_trait]
impl Step for ScriptStep {
    fn name(&self) -> &str {
        "script"
    }

    async fn execute(&self, ctx: &StepContext) -> Result<StepMeta, StepError> {
        let request = authorized(
            self.client.post(&self.config.script_api_url),
            &self.config,
        )
        .json(&ScriptRequest {
            topic: ctx.topic.as_deref(),
        });

        let response = request
            .send()
            .await
            .map_err(|e| transport_error("script service", e))?;
        let response = ensure_success("script service", response).await?;

        let payload: ScriptResponse = response
            .json()
            .await
            .map_err(|e| transport_error("script service", e))?;

        if payload.script.is_empty() {
            return Err(StepError::new("script service returned an empty script"));
        }

        tracing::debug!(
            title = %payload.title,
            chars = payload.script.len(),
            "Script generated",
        );

        let mut meta = StepMeta::new();
        meta.insert(META_VIDEO_TITLE.into(), payload.title.into());
        meta.insert(
            "scriptChars".into(),
            MetaValue::Number(payload.script.chars().count() as f64),
        );
        meta.insert(META_SCRIPT.into(), payload.script.into());
        Ok(meta)
    }
}
