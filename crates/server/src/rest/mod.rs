pub mod root;
pub mod todo;

use axum::{routing::get, Router};
use crate::db::AppState;

/// Build the REST API router.
///
/// The static `/api/todos/search` and `/api/todos/statistics` routes are
/// matched ahead of `/api/todos/{id}`.
pub fn api_router() -> Router<AppState> {
    Router::new()
        .route("/", get(root::root))
        // TODOs
        .route("/api/todos", get(todo::list_todos).post(todo::create_todo))
        .route("/api/todos/search", get(todo::search_todos))
        .route("/api/todos/statistics", get(todo::todo_statistics))
        .route("/api/todos/{id}", get(todo::get_todo).put(todo::update_todo).delete(todo::delete_todo))
        // Categories
        .route("/api/categories", get(todo::list_categories))
}
