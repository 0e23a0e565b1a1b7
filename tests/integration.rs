use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Method, Request, StatusCode, header};
use chrono::{Duration, NaiveDate};
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

use docstore_server::ResourceService;
use docstore_server::logging::{ManualClock, RollingFileLogger};
use docstore_server::server::router;
use docstore_server::storage::ResourceStore;

struct TestServer {
    data: TempDir,
    logs: TempDir,
    app: Router,
}

fn test_server() -> TestServer {
    let data = TempDir::new().unwrap();
    let logs = TempDir::new().unwrap();
    let audit = Arc::new(RollingFileLogger::new(logs.path(), "server", 10));
    let service = Arc::new(ResourceService::new(ResourceStore::new(data.path()), audit));
    let app = router(service, 1024);
    TestServer { data, logs, app }
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    body: &str,
) -> (StatusCode, Option<String>, String) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::from(body.to_string()))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .map(|v| v.to_str().unwrap().to_string());
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, content_type, String::from_utf8_lossy(&bytes).into_owned())
}

fn read_logs(dir: &Path) -> String {
    std::fs::read_dir(dir)
        .unwrap()
        .flatten()
        .map(|e| std::fs::read_to_string(e.path()).unwrap())
        .collect()
}

#[tokio::test]
async fn json_resource_lifecycle() {
    let server = test_server();
    let app = &server.app;

    let (status, _, _) = send(app, Method::POST, "/config?id=cfg1", r#"{"a":1}"#).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, content_type, body) = send(app, Method::GET, "/config?id=cfg1", "").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type.as_deref(), Some("application/json"));
    assert_eq!(body, r#"{"a":1}"#);

    let (status, _, body) = send(app, Method::POST, "/config?id=cfg1", r#"{"a":2}"#).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body.contains("already_exists"));

    let (status, _, _) = send(app, Method::PUT, "/config?id=cfg1", r#"{"a":2}"#).await;
    assert_eq!(status, StatusCode::OK);

    let (_, _, body) = send(app, Method::GET, "/config?id=cfg1", "").await;
    assert_eq!(body, r#"{"a":2}"#);

    let (status, _, _) = send(app, Method::DELETE, "/config?id=cfg1", "").await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _, _) = send(app, Method::GET, "/config?id=cfg1", "").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn invalid_json_is_rejected_without_writing() {
    let server = test_server();
    let app = &server.app;

    let (status, _, body) = send(app, Method::POST, "/config?id=bad", "{not json}").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("Invalid JSON format"));

    let (status, _, _) = send(app, Method::GET, "/config?id=bad", "").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(!server.data.path().join("configs/bad.json").exists());
}

#[tokio::test]
async fn identifier_errors_are_bad_requests() {
    let server = test_server();
    let app = &server.app;

    let (status, _, body) = send(app, Method::GET, "/config", "").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("missing_identifier"));

    let (status, _, body) = send(app, Method::GET, "/config?id=test:invalidid", "").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("invalid_identifier"));

    let (status, _, _) = send(app, Method::PUT, "/text?id=..%2Fescape", "x").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(!server.data.path().join("escape.txt").exists());
}

#[tokio::test]
async fn repeated_id_parameters_are_audited_rejections() {
    let server = test_server();
    let app = &server.app;

    let (status, _, _) = send(app, Method::PUT, "/config?id=a", "{}").await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, content_type, body) = send(app, Method::GET, "/config?id=a&id=b", "").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(content_type.as_deref(), Some("application/json"));
    assert!(body.contains("invalid_identifier"));

    let (status, _, body) = send(app, Method::DELETE, "/config?id=a&id=a", "").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("invalid_identifier"));

    let (status, _, _) = send(app, Method::GET, "/config?id=a", "").await;
    assert_eq!(status, StatusCode::OK);

    let logs = read_logs(server.logs.path());
    assert!(logs.contains("Rejected fetch: Invalid identifier format for json resource: a,b"));
    assert!(logs.contains("Rejected remove: Invalid identifier format for json resource: a,a"));
}

#[tokio::test]
async fn text_resources_are_opaque_and_separate() {
    let server = test_server();
    let app = &server.app;

    let (status, _, _) = send(app, Method::PUT, "/text?id=cfg1", "{not json either}").await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, content_type, body) = send(app, Method::GET, "/text?id=cfg1", "").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type.as_deref(), Some("text/plain; charset=utf-8"));
    assert_eq!(body, "{not json either}");

    let (status, _, _) = send(app, Method::GET, "/config?id=cfg1", "").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn internal_errors_hide_detail_from_callers() {
    let server = test_server();
    let configs = server.data.path().join("configs");
    std::fs::create_dir_all(&configs).unwrap();
    std::fs::write(configs.join("corrupt.json"), "{\"a\":").unwrap();

    let (status, _, body) = send(&server.app, Method::GET, "/config?id=corrupt", "").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body.contains("Internal server error"));
    assert!(!body.contains("EOF"));

    let logs = read_logs(server.logs.path());
    assert!(logs.contains("Error processing fetch for json resource corrupt"));
    assert!(logs.contains("Exception: stored content failed validation"));
}

#[tokio::test]
async fn oversized_bodies_are_refused() {
    let server = test_server();
    let big = format!("\"{}\"", "x".repeat(4096));

    let (status, _, _) = send(&server.app, Method::POST, "/config?id=big", &big).await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert!(!server.data.path().join("configs/big.json").exists());
}

#[tokio::test]
async fn health_reports_version() {
    let server = test_server();

    let (status, _, body) = send(&server.app, Method::GET, "/health", "").await;
    assert_eq!(status, StatusCode::OK);
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["status"], "ok");
    assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
}

#[test]
fn log_retention_keeps_most_recent_days() {
    let logs = TempDir::new().unwrap();
    let start = NaiveDate::from_ymd_opt(2024, 12, 25)
        .unwrap()
        .and_hms_opt(10, 0, 0)
        .unwrap();
    let clock = Arc::new(ManualClock::new(start));
    let logger =
        RollingFileLogger::with_clock(logs.path(), "server", 10, Box::new(Arc::clone(&clock)));

    for day in 0..15 {
        clock.set(start + Duration::days(day));
        logger.append("entry").unwrap();
    }

    let mut names: Vec<String> = std::fs::read_dir(logs.path())
        .unwrap()
        .flatten()
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();

    assert_eq!(names.len(), 10);
    assert_eq!(names.first().map(String::as_str), Some("server_2024-12-30.log"));
    assert_eq!(names.last().map(String::as_str), Some("server_2025-01-08.log"));
}
