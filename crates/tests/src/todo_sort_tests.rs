use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use crate::common;

async fn seed(app: &axum::Router) {
    common::create_test_todo(app, r#"{"title": "banana", "priority": "low", "due_date": "2025-03-01T00:00:00"}"#).await;
    common::create_test_todo(app, r#"{"title": "apple", "priority": "high", "due_date": "2025-01-01T00:00:00"}"#).await;
    common::create_test_todo(app, r#"{"title": "cherry", "priority": "medium", "due_date": "2025-02-01T00:00:00"}"#).await;
}

#[tokio::test]
async fn test_default_order_is_newest_first() {
    let (app, _pool) = common::test_app().await;
    seed(&app).await;
    let (_, response) = common::get(&app, "/api/todos").await;
    assert_eq!(common::titles(&response), vec!["cherry", "apple", "banana"]);
}

#[tokio::test]
async fn test_sort_by_created_at_ascending() {
    let (app, _pool) = common::test_app().await;
    seed(&app).await;
    let (_, response) = common::get(&app, "/api/todos?sort_by=created_at&order=asc").await;
    assert_eq!(common::titles(&response), vec!["banana", "apple", "cherry"]);
}

#[tokio::test]
async fn test_sort_by_title() {
    let (app, _pool) = common::test_app().await;
    seed(&app).await;

    let (_, asc) = common::get(&app, "/api/todos?sort_by=title&order=asc").await;
    assert_eq!(common::titles(&asc), vec!["apple", "banana", "cherry"]);

    let (_, desc) = common::get(&app, "/api/todos?sort_by=title&order=desc").await;
    assert_eq!(common::titles(&desc), vec!["cherry", "banana", "apple"]);
}

#[tokio::test]
async fn test_sort_by_due_date() {
    let (app, _pool) = common::test_app().await;
    seed(&app).await;
    let (_, response) = common::get(&app, "/api/todos?sort_by=due_date&order=asc").await;
    assert_eq!(common::titles(&response), vec!["apple", "cherry", "banana"]);
}

#[tokio::test]
async fn test_unknown_order_means_descending() {
    let (app, _pool) = common::test_app().await;
    seed(&app).await;
    let (status, response) = common::get(&app, "/api/todos?sort_by=title&order=upwards").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(common::titles(&response), vec!["cherry", "banana", "apple"]);
}

#[tokio::test]
async fn test_unknown_sort_field_falls_back_to_created_at_desc() {
    let (app, _pool) = common::test_app().await;
    seed(&app).await;
    let (status, response) = common::get(&app, "/api/todos?sort_by=nonexistent_field").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(common::titles(&response), vec!["cherry", "apple", "banana"]);
}

#[tokio::test]
async fn test_sort_field_is_not_injected_into_sql() {
    let (app, pool) = common::test_app().await;
    seed(&app).await;
    let (status, _) =
        common::get(&app, "/api/todos?sort_by=title%3B%20DROP%20TABLE%20todos").await;
    assert_eq!(status, StatusCode::OK);

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM todos")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 3);
}
