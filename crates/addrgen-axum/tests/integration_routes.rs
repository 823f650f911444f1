//! Integration tests for the Axum web server.
//!
//! These tests verify that routes are wired to the generation service and
//! that domain errors come back with the right status codes.

mod common;

use axum::http::StatusCode;
use serde_json::json;
use tempfile::TempDir;
use tower::ServiceExt;

use common::{app_without_generator, body_json, body_string, get, post_empty, post_json};

#[tokio::test]
async fn health_endpoint_returns_ok() {
    let dir = TempDir::new().unwrap();
    let app = app_without_generator(&dir).await;

    let response = app.oneshot(get("/health")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "OK");
}

#[tokio::test]
async fn processes_endpoint_starts_empty() {
    let dir = TempDir::new().unwrap();
    let app = app_without_generator(&dir).await;

    let response = app
        .oneshot(get("/api/generation/processes"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "[]");
}

#[tokio::test]
async fn countries_endpoint_lists_cache_sorted() {
    let dir = TempDir::new().unwrap();
    let app = app_without_generator(&dir).await;

    let response = app.oneshot(get("/api/countries")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let codes: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["code"].as_str().unwrap())
        .collect();
    assert_eq!(codes, vec!["DE", "FR", "US"]);
    assert_eq!(body[2]["name"], "United States");
}

#[tokio::test]
async fn invalid_start_requests_are_rejected() {
    let dir = TempDir::new().unwrap();
    let app = app_without_generator(&dir).await;

    for body in [
        json!({"countryCode": "U", "count": 10}),
        json!({"countryCode": "USA", "count": 10}),
        json!({"countryCode": "US", "count": 0}),
        json!({"countryCode": "US", "count": -5}),
        json!({"countryCode": "US"}),
        json!({"countryCode": "US", "count": "10"}),
        json!({"countryCode": 12, "count": 10}),
        json!(["US", 10]),
    ] {
        let response = app
            .clone()
            .oneshot(post_json("/api/generation", &body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body: {body}");
        let error = body_json(response).await;
        assert_eq!(error["status"], 400);
        assert!(error["error"].is_string(), "body: {body}");
    }

    let response = app
        .oneshot(get("/api/generation/processes"))
        .await
        .unwrap();
    assert_eq!(body_string(response).await, "[]");
}

#[tokio::test]
async fn unknown_process_is_not_found() {
    let dir = TempDir::new().unwrap();
    let app = app_without_generator(&dir).await;

    for request in [
        get("/api/generation/processes/US_0_0"),
        get("/api/generation/processes/US_0_0/stream"),
        post_empty("/api/generation/processes/US_0_0/cancel"),
    ] {
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}

#[tokio::test]
async fn spawn_failure_still_reports_started() {
    let dir = TempDir::new().unwrap();
    let app = app_without_generator(&dir).await;

    let response = app
        .clone()
        .oneshot(post_json(
            "/api/generation",
            &json!({"countryCode": "fr", "count": 25}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let started = body_json(response).await;
    assert_eq!(started["status"], "started");
    assert_eq!(started["countryCode"], "FR");
    assert_eq!(started["countryName"], "France");
    assert_eq!(started["count"], 25);
    let id = started["processId"].as_str().unwrap().to_string();
    assert!(id.starts_with("FR_"));

    let response = app
        .clone()
        .oneshot(get(&format!("/api/generation/processes/{id}")))
        .await
        .unwrap();
    let record = body_json(response).await;
    assert_eq!(record["status"], "error");
    assert!(record["endTime"].is_string());
    assert!(
        record["error"]
            .as_str()
            .unwrap()
            .starts_with("Failed to start generator")
    );

    // Already terminal: cancel conflicts
    let response = app
        .oneshot(post_empty(&format!("/api/generation/processes/{id}/cancel")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let error = body_json(response).await;
    assert!(error["error"].as_str().unwrap().ends_with("already error"));
}

#[tokio::test]
async fn stream_of_finished_process_is_status_then_complete() {
    let dir = TempDir::new().unwrap();
    let app = app_without_generator(&dir).await;

    let response = app
        .clone()
        .oneshot(post_json(
            "/api/generation",
            &json!({"countryCode": "DE", "count": 1}),
        ))
        .await
        .unwrap();
    let id = body_json(response).await["processId"]
        .as_str()
        .unwrap()
        .to_string();

    let response = app
        .oneshot(get(&format!("/api/generation/processes/{id}/stream")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("content-type").unwrap(),
        "text/event-stream"
    );

    let body = body_string(response).await;
    let events: Vec<serde_json::Value> = body
        .lines()
        .filter_map(|line| line.strip_prefix("data: "))
        .map(|data| serde_json::from_str(data).unwrap())
        .collect();

    assert_eq!(events.len(), 2);
    assert_eq!(events[0]["type"], "status");
    assert_eq!(events[0]["status"], "error");
    assert_eq!(events[1]["type"], "complete");
}
