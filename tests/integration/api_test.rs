// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::helpers::build_app;
use axum_test::TestServer;
use serde_json::{json, Value};
use std::time::Duration;
use tokio::time::{sleep, Instant};
use uuid::Uuid;
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn health_and_version_endpoints_respond() {
    let (app, _queue) = build_app(0);
    let server = TestServer::new(app).expect("test server");

    let health = server.get("/health").await;
    health.assert_status_ok();
    let body: Value = health.json();
    assert_eq!(body["status"], "healthy");

    let version = server.get("/version").await;
    version.assert_status_ok();
    assert_eq!(version.text(), env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn analyze_rejects_an_empty_domain_list() {
    let (app, _queue) = build_app(0);
    let server = TestServer::new(app).expect("test server");

    let response = server
        .post("/analyze")
        .json(&json!({ "domains": [] }))
        .await;
    assert_eq!(response.status_code().as_u16(), 400);
    let body: Value = response.json();
    assert!(body["error"]
        .as_str()
        .expect("error message")
        .contains("validation"));
}

#[tokio::test]
async fn analyze_returns_one_record_per_domain() {
    let mock = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<html>Contact sales@orchard-web.com</html>"),
        )
        .mount(&mock)
        .await;

    let (app, _queue) = build_app(0);
    let server = TestServer::new(app).expect("test server");

    let response = server
        .post("/analyze")
        .json(&json!({
            "domains": [mock.uri(), "127.0.0.1:1"],
            "batch_size": 5,
            "timeout": 5,
        }))
        .await;
    response.assert_status_ok();

    let reports: Value = response.json();
    let reports = reports.as_array().expect("array response");
    assert_eq!(reports.len(), 2);

    // Completion order is not guaranteed; look records up by domain
    let by_domain = |domain: &str| {
        reports
            .iter()
            .find(|r| r["domain"] == domain)
            .unwrap_or_else(|| panic!("missing record for {}", domain))
    };
    let healthy = by_domain(&mock.uri());
    assert_eq!(healthy["status"], "Active");
    assert_eq!(healthy["emails"][0], "sales@orchard-web.com");
    let broken = by_domain("127.0.0.1:1");
    assert_eq!(broken["status"], "Error");
}

#[tokio::test]
async fn job_flow_from_submission_to_results() {
    let mock = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<html>Mail: desk@orchard-web.com</html>"),
        )
        .mount(&mock)
        .await;

    let (app, _queue) = build_app(2);
    let server = TestServer::new(app).expect("test server");

    let submitted = server
        .post("/jobs")
        .json(&json!({
            "domains": [mock.uri()],
            "batch_size": 2,
            "timeout": 5,
            "priority": 3,
        }))
        .await;
    submitted.assert_status_ok();
    let submitted: Value = submitted.json();
    assert_eq!(submitted["status"], "submitted");
    let job_id = submitted["job_id"].as_str().expect("job id").to_string();

    // Poll the status endpoint until the job reaches a terminal state
    let deadline = Instant::now() + Duration::from_secs(30);
    let status_url = format!("/jobs/{}/status", job_id);
    loop {
        let status: Value = server.get(&status_url).await.json();
        if status["status"] == "completed" {
            assert_eq!(status["processed_domains"], 1);
            assert_eq!(status["total_domains"], 1);
            break;
        }
        assert!(status["status"] != "failed", "job failed: {:?}", status);
        assert!(Instant::now() < deadline, "job never completed");
        sleep(Duration::from_millis(50)).await;
    }

    let results: Value = server
        .get(&format!("/jobs/{}/results", job_id))
        .await
        .json();
    assert_eq!(results["status"], "completed");
    assert_eq!(results["results"][0]["emails"][0], "desk@orchard-web.com");
}

#[tokio::test]
async fn unknown_job_id_returns_not_found() {
    let (app, _queue) = build_app(0);
    let server = TestServer::new(app).expect("test server");

    let response = server
        .get(&format!("/jobs/{}/status", Uuid::new_v4()))
        .await;
    assert_eq!(response.status_code().as_u16(), 404);
}

#[tokio::test]
async fn results_echo_status_while_job_is_still_queued() {
    // No workers: the job can never leave the queued state
    let (app, _queue) = build_app(0);
    let server = TestServer::new(app).expect("test server");

    let submitted: Value = server
        .post("/jobs")
        .json(&json!({ "domains": ["127.0.0.1:1"] }))
        .await
        .json();
    let job_id = submitted["job_id"].as_str().expect("job id");

    let results: Value = server
        .get(&format!("/jobs/{}/results", job_id))
        .await
        .json();
    assert_eq!(results["status"], "queued");
    assert!(results["message"]
        .as_str()
        .expect("message")
        .contains("queued"));
}

#[tokio::test]
async fn queue_stats_expose_worker_and_queue_occupancy() {
    let (app, _queue) = build_app(2);
    let server = TestServer::new(app).expect("test server");

    let stats: Value = server.get("/queue/stats").await.json();
    assert_eq!(stats["total_workers"], 2);
    assert!(stats["active_workers"].as_u64().expect("count") <= 2);
    assert_eq!(stats["jobs_processed"], 0);

    let performance: Value = server.get("/performance").await.json();
    assert_eq!(performance["rate_limiter"]["max_concurrent"], 20);
    assert_eq!(performance["session_pool"]["pool_size"], 2);
}
