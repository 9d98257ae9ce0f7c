use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use crate::common;

async fn seed(app: &axum::Router) {
    common::create_test_todo(app, r#"{"title": "Ship release", "priority": "high", "category": "work"}"#).await;
    common::create_test_todo(app, r#"{"title": "Fix bug", "priority": "high", "completed": true, "category": "work"}"#).await;
    common::create_test_todo(app, r#"{"title": "Water plants", "priority": "low", "category": "home"}"#).await;
    common::create_test_todo(app, r#"{"title": "Read book", "description": "Sci-fi novel"}"#).await;
}

#[tokio::test]
async fn test_list_empty_store_returns_empty_array() {
    let (app, _pool) = common::test_app().await;
    let (status, response) = common::get(&app, "/api/todos").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response, serde_json::json!([]));
}

#[tokio::test]
async fn test_list_returns_everything_without_filters() {
    let (app, _pool) = common::test_app().await;
    seed(&app).await;
    let (status, response) = common::get(&app, "/api/todos").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response.as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn test_list_filter_completed() {
    let (app, _pool) = common::test_app().await;
    seed(&app).await;

    let (_, done) = common::get(&app, "/api/todos?completed=true").await;
    assert_eq!(common::titles(&done), vec!["Fix bug"]);

    let (_, open) = common::get(&app, "/api/todos?completed=false").await;
    assert_eq!(open.as_array().unwrap().len(), 3);
    assert!(open.as_array().unwrap().iter().all(|t| t["completed"] == false));
}

#[tokio::test]
async fn test_list_filter_completed_accepts_numeric_flag() {
    let (app, _pool) = common::test_app().await;
    seed(&app).await;
    let (status, done) = common::get(&app, "/api/todos?completed=1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(common::titles(&done), vec!["Fix bug"]);
}

#[tokio::test]
async fn test_list_filter_completed_invalid_is_bad_request() {
    let (app, _pool) = common::test_app().await;
    let (status, response) = common::get(&app, "/api/todos?completed=perhaps").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["kind"], "BadRequest");
}

#[tokio::test]
async fn test_list_filter_priority_and_completed() {
    let (app, _pool) = common::test_app().await;
    seed(&app).await;
    let (status, response) = common::get(&app, "/api/todos?priority=high&completed=false").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(common::titles(&response), vec!["Ship release"]);
}

#[tokio::test]
async fn test_list_filter_category_is_exact() {
    let (app, _pool) = common::test_app().await;
    seed(&app).await;

    let (_, work) = common::get(&app, "/api/todos?category=work&sort_by=title&order=asc").await;
    assert_eq!(common::titles(&work), vec!["Fix bug", "Ship release"]);

    let (_, partial) = common::get(&app, "/api/todos?category=wor").await;
    assert_eq!(partial, serde_json::json!([]));
}

#[tokio::test]
async fn test_list_search_is_case_insensitive_across_fields() {
    let (app, _pool) = common::test_app().await;
    seed(&app).await;

    let (_, by_title) = common::get(&app, "/api/todos?search=SHIP").await;
    assert_eq!(common::titles(&by_title), vec!["Ship release"]);

    let (_, by_description) = common::get(&app, "/api/todos?search=sci-fi").await;
    assert_eq!(common::titles(&by_description), vec!["Read book"]);

    let (_, by_category) = common::get(&app, "/api/todos?search=hom").await;
    assert_eq!(common::titles(&by_category), vec!["Water plants"]);
}

#[tokio::test]
async fn test_list_search_combines_with_other_filters() {
    let (app, _pool) = common::test_app().await;
    seed(&app).await;
    let (_, response) = common::get(&app, "/api/todos?search=work&completed=true").await;
    assert_eq!(common::titles(&response), vec!["Fix bug"]);
}

#[tokio::test]
async fn test_list_empty_filter_values_are_ignored() {
    let (app, _pool) = common::test_app().await;
    seed(&app).await;
    let (status, response) =
        common::get(&app, "/api/todos?search=&category=&priority=&completed=").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response.as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn test_list_search_matches_non_ascii_case_insensitively() {
    let (app, _pool) = common::test_app().await;
    common::create_test_todo(&app, r#"{"title": "Réunion", "category": "ÉCOLE"}"#).await;
    common::create_titled(&app, "Other").await;

    let (status, response) = common::get(&app, "/api/todos?search=%C3%A9cole").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(common::titles(&response), vec!["Réunion"]);
}
