use axum::http::StatusCode;
use crate::common;

#[tokio::test]
async fn test_root_reports_ok() {
    let (app, _pool) = common::test_app().await;
    let (status, response) = common::get(&app, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["status"], "ok");
    assert!(response["message"].as_str().unwrap().contains("running"));
}

#[tokio::test]
async fn test_health_reports_connected_db() {
    let (app, _pool) = common::test_app().await;
    let (status, response) = common::get(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["status"], "ok");
    assert_eq!(response["db"], "connected");
}

#[tokio::test]
async fn test_openapi_docs_are_served() {
    let (app, _pool) = common::test_app().await;
    let (status, _) = common::get(&app, "/docs").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_responses_carry_request_id() {
    let (app, _pool) = common::test_app().await;
    let req = axum::http::Request::builder()
        .uri("/")
        .body(axum::body::Body::empty())
        .unwrap();
    let (_, headers, _) = common::send_raw(&app, req).await;
    assert!(headers.contains_key("x-request-id"));
}
