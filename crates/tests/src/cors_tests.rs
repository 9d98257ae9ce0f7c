use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use server::config::CorsPolicy;
use crate::common;

fn preflight(origin: &str) -> Request<Body> {
    Request::builder()
        .method("OPTIONS")
        .uri("/api/todos")
        .header("origin", origin)
        .header("access-control-request-method", "POST")
        .header("access-control-request-headers", "content-type")
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn test_allowed_origin_gets_cors_headers() {
    let (app, _pool) =
        common::test_app_with_cors(CorsPolicy::Origins(vec!["http://localhost:5173".to_string()])).await;
    let (status, headers, _) = common::send_raw(&app, preflight("http://localhost:5173")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        headers.get("access-control-allow-origin").unwrap(),
        "http://localhost:5173"
    );
    assert_eq!(headers.get("access-control-allow-credentials").unwrap(), "true");
}

#[tokio::test]
async fn test_unlisted_origin_gets_no_cors_headers() {
    let (app, _pool) =
        common::test_app_with_cors(CorsPolicy::Origins(vec!["http://localhost:5173".to_string()])).await;
    let (_, headers, _) = common::send_raw(&app, preflight("https://evil.example")).await;
    assert!(headers.get("access-control-allow-origin").is_none());
}

#[tokio::test]
async fn test_allow_any_echoes_origin() {
    let (app, _pool) = common::test_app_with_cors(CorsPolicy::AllowAny).await;
    let (_, headers, _) = common::send_raw(&app, preflight("https://anything.example")).await;
    assert_eq!(
        headers.get("access-control-allow-origin").unwrap(),
        "https://anything.example"
    );
}

#[tokio::test]
async fn test_simple_request_carries_cors_headers() {
    let (app, _pool) = common::test_app_with_cors(CorsPolicy::AllowAny).await;
    let req = Request::builder()
        .method("GET")
        .uri("/api/todos")
        .header("origin", "http://localhost:3000")
        .body(Body::empty())
        .unwrap();
    let (status, headers, _) = common::send_raw(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        headers.get("access-control-allow-origin").unwrap(),
        "http://localhost:3000"
    );
}
