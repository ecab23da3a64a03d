//! Integration tests for the trigger and status endpoints.

mod common;

use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;
use common::{build_test_app, expect_json, get, happy_steps, post_json, FakeStep};
use serde_json::json;

use autoreel_pipeline::Step;

// ---------------------------------------------------------------------------
// Health
// ---------------------------------------------------------------------------

#[tokio::test]
async fn health_check_returns_ok_with_json() {
    let (app, _ledger) = build_test_app(happy_steps());
    let response = get(app, "/health").await;

    let json = expect_json(response, StatusCode::OK).await;
    assert_eq!(json["status"], "ok");
    assert!(json["version"].is_string());
}

#[tokio::test]
async fn unknown_route_returns_404() {
    let (app, _ledger) = build_test_app(happy_steps());
    let response = get(app, "/this-route-does-not-exist").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Manual trigger
// ---------------------------------------------------------------------------

#[tokio::test]
async fn manual_trigger_returns_finalized_run() {
    let (app, _ledger) = build_test_app(happy_steps());

    let response = post_json(app, "/api/v1/trigger", json!({"topic": "AI productivity"})).await;
    let body = expect_json(response, StatusCode::OK).await;

    assert_eq!(body["ok"], true);
    assert!(body["runId"].is_string());

    let run = &body["run"];
    assert_eq!(run["status"], "success");
    assert_eq!(run["trigger"], "manual");
    assert_eq!(run["topic"], "AI productivity");
    assert_eq!(run["videoTitle"], "Ten Focus Hacks");
    assert_eq!(run["publishedUrl"], "https://videos.example/ten");

    let steps = run["steps"].as_array().unwrap();
    let names: Vec<_> = steps.iter().map(|s| s["name"].as_str().unwrap()).collect();
    assert_eq!(names, ["script", "render", "upload"]);
    assert!(steps.iter().all(|s| s["status"] == "success"));
}

#[tokio::test]
async fn manual_trigger_accepts_empty_body() {
    let (app, _ledger) = build_test_app(happy_steps());
    let response = post_json(app, "/api/v1/trigger", json!({})).await;
    let body = expect_json(response, StatusCode::OK).await;
    assert_eq!(body["ok"], true);
    assert!(body["run"].get("topic").is_none());
}

#[tokio::test]
async fn manual_trigger_rejects_short_topic() {
    let (app, ledger) = build_test_app(happy_steps());
    let response = post_json(app, "/api/v1/trigger", json!({"topic": "ai"})).await;
    let body = expect_json(response, StatusCode::BAD_REQUEST).await;
    assert_eq!(body["code"], "VALIDATION_ERROR");
    // Rejected before any run was created.
    assert!(ledger.list_runs().await.is_empty());
}

#[tokio::test]
async fn failed_step_surfaces_in_returned_run() {
    let steps: Vec<Arc<dyn Step>> = vec![
        Arc::new(FakeStep::ok("script").with_meta("videoTitle", "Doomed")),
        Arc::new(FakeStep::failing("render", "render timeout")),
        Arc::new(FakeStep::ok("upload")),
    ];
    let (app, _ledger) = build_test_app(steps);

    let response = post_json(app, "/api/v1/trigger", json!({"topic": "deep sea mining"})).await;
    let body = expect_json(response, StatusCode::OK).await;

    assert_eq!(body["ok"], false);
    let run = &body["run"];
    assert_eq!(run["status"], "error");

    let steps = run["steps"].as_array().unwrap();
    assert_eq!(steps.len(), 2);
    assert_eq!(steps[1]["name"], "render");
    assert_eq!(steps[1]["status"], "error");
    assert_eq!(steps[1]["error"], "render timeout");
}

#[tokio::test]
async fn concurrent_manual_trigger_returns_409() {
    let steps: Vec<Arc<dyn Step>> =
        vec![Arc::new(FakeStep::ok("script").with_delay(Duration::from_millis(300)))];
    let (app, _ledger) = build_test_app(steps);

    let first = {
        let app = app.clone();
        tokio::spawn(async move {
            post_json(app, "/api/v1/trigger", json!({"topic": "first topic"})).await
        })
    };

    tokio::time::sleep(Duration::from_millis(80)).await;

    let second = post_json(app, "/api/v1/trigger", json!({"topic": "second topic"})).await;
    let body = expect_json(second, StatusCode::CONFLICT).await;
    assert_eq!(body["code"], "CONCURRENT_RUN");

    let first = first.await.unwrap();
    assert_eq!(first.status(), StatusCode::OK);
}

// ---------------------------------------------------------------------------
// Cron trigger
// ---------------------------------------------------------------------------

#[tokio::test]
async fn cron_trigger_runs_pipeline() {
    let (app, ledger) = build_test_app(happy_steps());

    let response = get(app, "/api/v1/cron/run").await;
    let body = expect_json(response, StatusCode::OK).await;

    assert_eq!(body["ok"], true);
    assert!(body["runId"].is_string());
    assert!(body.get("skipped").is_none());

    let runs = ledger.list_runs().await;
    assert_eq!(runs.len(), 1);
    assert_eq!(serde_json::to_value(runs[0].trigger).unwrap(), "cron");
}

#[tokio::test]
async fn cron_trigger_skips_while_run_active() {
    let steps: Vec<Arc<dyn Step>> =
        vec![Arc::new(FakeStep::ok("script").with_delay(Duration::from_millis(300)))];
    let (app, ledger) = build_test_app(steps);

    let manual = {
        let app = app.clone();
        tokio::spawn(async move {
            post_json(app, "/api/v1/trigger", json!({"topic": "busy topic"})).await
        })
    };

    tokio::time::sleep(Duration::from_millis(80)).await;

    // The scheduler must see a calm 200, not an error.
    let response = get(app, "/api/v1/cron/run").await;
    let body = expect_json(response, StatusCode::OK).await;
    assert_eq!(body["ok"], false);
    assert_eq!(body["skipped"], true);
    assert!(body.get("runId").is_none());

    manual.await.unwrap();
    // The skipped cron trigger created no run record.
    assert_eq!(ledger.list_runs().await.len(), 1);
}

// ---------------------------------------------------------------------------
// Status queries
// ---------------------------------------------------------------------------

#[tokio::test]
async fn status_lists_runs_most_recent_first() {
    let (app, _ledger) = build_test_app(happy_steps());

    post_json(
        app.clone(),
        "/api/v1/trigger",
        json!({"topic": "first topic"}),
    )
    .await;
    post_json(
        app.clone(),
        "/api/v1/trigger",
        json!({"topic": "second topic"}),
    )
    .await;

    let response = get(app, "/api/v1/status").await;
    let body = expect_json(response, StatusCode::OK).await;

    let runs = body["runs"].as_array().unwrap();
    assert_eq!(runs.len(), 2);
    assert_eq!(runs[0]["topic"], "second topic");
    assert_eq!(runs[1]["topic"], "first topic");
}

#[tokio::test]
async fn get_run_returns_single_run() {
    let (app, _ledger) = build_test_app(happy_steps());

    let created = post_json(app.clone(), "/api/v1/trigger", json!({})).await;
    let body = expect_json(created, StatusCode::OK).await;
    let run_id = body["runId"].as_str().unwrap().to_string();

    let response = get(app, &format!("/api/v1/runs/{run_id}")).await;
    let run = expect_json(response, StatusCode::OK).await;
    assert_eq!(run["id"], run_id.as_str());
    assert_eq!(run["status"], "success");
}

#[tokio::test]
async fn get_unknown_run_returns_404() {
    let (app, _ledger) = build_test_app(happy_steps());
    let response = get(
        app,
        "/api/v1/runs/00000000-0000-0000-0000-000000000000",
    )
    .await;
    let body = expect_json(response, StatusCode::NOT_FOUND).await;
    assert_eq!(body["code"], "NOT_FOUND");
}
