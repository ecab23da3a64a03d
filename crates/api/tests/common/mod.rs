use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{header::CONTENT_TYPE, Method, Request, Response, StatusCode};
use axum::Router;
use tower::ServiceExt;

use autoreel_api::config::ServerConfig;
use autoreel_api::routes;
use autoreel_api::state::AppState;
use autoreel_core::run::{MetaValue, StepMeta};
use autoreel_pipeline::{Orchestrator, RunLedger, Step, StepContext, StepError};

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        retain_last_runs: None,
    }
}

/// Build the application router over the given step list.
///
/// Mirrors the router construction in `main.rs` minus the outer
/// middleware layers, so tests exercise the handler surface without
/// network-dependent steps. Returns the ledger for direct inspection.
pub fn build_test_app(steps: Vec<Arc<dyn Step>>) -> (Router, Arc<RunLedger>) {
    let ledger = Arc::new(RunLedger::new());
    let orchestrator = Arc::new(Orchestrator::new(Arc::clone(&ledger), steps));

    let state = AppState {
        orchestrator,
        ledger: Arc::clone(&ledger),
        config: Arc::new(test_config()),
    };

    let app = Router::new()
        .merge(routes::health::router())
        .nest("/api/v1", routes::api_routes())
        .with_state(state);

    (app, ledger)
}

/// The canonical three fake steps, all succeeding.
pub fn happy_steps() -> Vec<Arc<dyn Step>> {
    vec![
        Arc::new(
            FakeStep::ok("script")
                .with_meta("videoTitle", "Ten Focus Hacks")
                .with_meta("script", "narration text"),
        ),
        Arc::new(FakeStep::ok("render").with_meta("videoUrl", "https://cdn.example/v.mp4")),
        Arc::new(FakeStep::ok("upload").with_meta("publishedUrl", "https://videos.example/ten")),
    ]
}

/// Configurable fake step for handler tests.
pub struct FakeStep {
    name: &'static str,
    meta: StepMeta,
    error: Option<&'static str>,
    delay: Option<Duration>,
}

impl FakeStep {
    pub fn ok(name: &'static str) -> Self {
        Self {
            name,
            meta: StepMeta::new(),
            error: None,
            delay: None,
        }
    }

    pub fn failing(name: &'static str, message: &'static str) -> Self {
        Self {
            name,
            meta: StepMeta::new(),
            error: Some(message),
            delay: None,
        }
    }

    pub fn with_meta(mut self, key: &str, value: &str) -> Self {
        self.meta
            .insert(key.to_string(), MetaValue::String(value.to_string()));
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

#[async_trait::async_trait]
impl Step for FakeStep {
    fn name(&self) -> &str {
        self.name
    }

    async fn execute(&self, _ctx: &StepContext) -> Result<StepMeta, StepError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match self.error {
            Some(message) => Err(StepError::new(message)),
            None => Ok(self.meta.clone()),
        }
    }
}

/// Issue a GET request against the app.
pub async fn get(app: Router, uri: &str) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .method(Method::GET)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

/// Issue a POST request with a JSON body against the app.
pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
    .unwrap()
}

/// Read a response body as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = http_body_util::BodyExt::collect(response.into_body())
        .await
        .unwrap()
        .to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Assert status and return the parsed body in one go.
pub async fn expect_json(response: Response<Body>, status: StatusCode) -> serde_json::Value {
    assert_eq!(response.status(), status);
    body_json(response).await
}
