//! Pipeline configuration loaded from environment variables.

use std::time::Duration;

/// External service endpoints and HTTP client settings for the
/// built-in steps.
///
/// All fields have defaults suitable for local development against
/// stub services; override via environment variables in production.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Script-generation service endpoint.
    pub script_api_url: String,
    /// Render service endpoint.
    pub render_api_url: String,
    /// Publishing service endpoint.
    pub upload_api_url: String,
    /// Bearer token sent to all three services, if set.
    pub api_key: Option<String>,
    /// Per-request timeout for outbound step calls, in seconds.
    pub request_timeout_secs: u64,
}

impl PipelineConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                     | Default                            |
    /// |-----------------------------|------------------------------------|
    /// | `SCRIPT_API_URL`            | `http://localhost:8801/v1/scripts` |
    /// | `RENDER_API_URL`            | `http://localhost:8802/v1/renders` |
    /// | `UPLOAD_API_URL`            | `http://localhost:8803/v1/uploads` |
    /// | `PIPELINE_API_KEY`          | unset                              |
    /// | `STEP_REQUEST_TIMEOUT_SECS` | `300`                              |
    pub fn from_env() -> Self {
        let script_api_url = std::env::var("SCRIPT_API_URL")
            .unwrap_or_else(|_| "http://localhost:8801/v1/scripts".into());
        let render_api_url = std::env::var("RENDER_API_URL")
            .unwrap_or_else(|_| "http://localhost:8802/v1/renders".into());
        let upload_api_url = std::env::var("UPLOAD_API_URL")
            .unwrap_or_else(|_| "http://localhost:8803/v1/uploads".into());

        let api_key = std::env::var("PIPELINE_API_KEY").ok().filter(|k| !k.is_empty());

        let request_timeout_secs: u64 = std::env::var("STEP_REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "300".into())
            .parse()
            .expect("STEP_REQUEST_TIMEOUT_SECS must be a valid u64");

        Self {
            script_api_url,
            render_api_url,
            upload_api_url,
            api_key,
            request_timeout_secs,
        }
    }

    /// Timeout as a [`Duration`] for reqwest client construction.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
