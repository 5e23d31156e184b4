//! Health endpoint tests.
//!
//! These tests require the server running (cargo run -p sous-chef-web).

use reqwest::StatusCode;
use sous_chef_integration_tests::{base_url, client};

#[tokio::test]
#[ignore = "Requires running server"]
async fn test_health() {
    let resp = client()
        .get(format!("{}/health", base_url()))
        .send()
        .await
        .expect("Failed to call /health");

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.text().await.expect("Failed to read body"), "ok");
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_readiness() {
    let resp = client()
        .get(format!("{}/health/ready", base_url()))
        .send()
        .await
        .expect("Failed to call /health/ready");

    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore = "Requires running server"]
async fn test_request_id_echoed() {
    let resp = client()
        .get(format!("{}/health", base_url()))
        .header("x-request-id", "it-health-1")
        .send()
        .await
        .expect("Failed to call /health");

    assert_eq!(
        resp.headers()
            .get("x-request-id")
            .and_then(|v| v.to_str().ok()),
        Some("it-health-1")
    );
}
