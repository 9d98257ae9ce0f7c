use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use crate::common;

#[tokio::test]
async fn test_create_todo_minimal_applies_defaults() {
    let (app, _pool) = common::test_app().await;
    let (status, response) = common::post_json(&app, "/api/todos", r#"{"title": "Buy milk"}"#).await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(response["id"].as_i64().unwrap() > 0);
    assert_eq!(response["title"], "Buy milk");
    assert_eq!(response["completed"], false);
    assert_eq!(response["priority"], "medium");
    assert!(response["description"].is_null());
    assert!(response["category"].is_null());
    assert!(response["due_date"].is_null());
    assert!(response["created_at"].is_string());
}

#[tokio::test]
async fn test_create_todo_all_fields() {
    let (app, _pool) = common::test_app().await;
    let body = r#"{
        "title": "File taxes",
        "description": "Before the deadline",
        "completed": true,
        "priority": "high",
        "category": "finance",
        "due_date": "2025-04-15T23:59:00"
    }"#;
    let (status, response) = common::post_json(&app, "/api/todos", body).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(response["description"], "Before the deadline");
    assert_eq!(response["completed"], true);
    assert_eq!(response["priority"], "high");
    assert_eq!(response["category"], "finance");
    assert_eq!(response["due_date"], "2025-04-15T23:59:00");
}

#[tokio::test]
async fn test_create_todo_due_date_with_offset_is_stored_as_utc() {
    let (app, _pool) = common::test_app().await;
    let body = r#"{"title": "Call", "due_date": "2025-04-15T10:00:00+02:00"}"#;
    let (status, response) = common::post_json(&app, "/api/todos", body).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(response["due_date"], "2025-04-15T08:00:00");
}

#[tokio::test]
async fn test_create_todo_empty_title_is_accepted() {
    let (app, _pool) = common::test_app().await;
    let (status, response) = common::post_json(&app, "/api/todos", r#"{"title": ""}"#).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(response["title"], "");
}

#[tokio::test]
async fn test_create_todo_unconventional_priority_is_stored() {
    let (app, _pool) = common::test_app().await;
    let (status, response) =
        common::post_json(&app, "/api/todos", r#"{"title": "x", "priority": "urgent"}"#).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(response["priority"], "urgent");
}

#[tokio::test]
async fn test_create_todo_missing_title_is_rejected() {
    let (app, _pool) = common::test_app().await;
    let (status, response) = common::post_json(&app, "/api/todos", r#"{"description": "no title"}"#).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response["kind"], "ValidationError");
    assert_eq!(response["field_errors"]["title"], "missing field");
}

#[tokio::test]
async fn test_create_todo_wrong_type_is_rejected() {
    let (app, _pool) = common::test_app().await;
    let (status, response) =
        common::post_json(&app, "/api/todos", r#"{"title": "x", "completed": "sometimes"}"#).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(response["field_errors"]["completed"].is_string(), "{response}");

    let (status, _) =
        common::post_json(&app, "/api/todos", r#"{"title": "x", "due_date": "whenever"}"#).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_create_todo_malformed_json_is_bad_request() {
    let (app, _pool) = common::test_app().await;
    let (status, response) = common::post_json(&app, "/api/todos", r#"{"title": "#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["kind"], "BadRequest");
}

#[tokio::test]
async fn test_create_todo_ids_are_unique() {
    let (app, _pool) = common::test_app().await;
    let first = common::create_titled(&app, "one").await;
    let second = common::create_titled(&app, "two").await;
    assert_ne!(first, second);
}

#[tokio::test]
async fn test_create_todo_persistence_failure_rolls_back() {
    let (app, pool) = common::test_app().await;
    sqlx::query(
        "CREATE TRIGGER reject_boom BEFORE INSERT ON todos WHEN NEW.title = 'boom'
         BEGIN SELECT RAISE(ABORT, 'insert rejected'); END",
    )
    .execute(&pool)
    .await
    .unwrap();

    let (status, response) = common::post_json(&app, "/api/todos", r#"{"title": "boom"}"#).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(response["message"].as_str().unwrap().contains("insert rejected"));

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM todos")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 0);

    // The store still accepts writes afterwards.
    common::create_titled(&app, "fine").await;
}
