use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use sqlx::{Pool, Sqlite};

use crate::extract::{ApiJson, ApiQuery};
use crate::repo::todo::TodoFilter;
use shared_types::{
    lenient_bool, AppError, CategoriesResponse, CreateTodoRequest, SortField, SortOrder,
    TodoResponse, TodoStatistics, UpdateTodoRequest,
};

// ---------------------------------------------------------------------------
// Query parameters
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TodoListParams {
    /// Filter by completion status.
    #[serde(default, deserialize_with = "lenient_bool")]
    pub completed: Option<bool>,
    /// Case-insensitive match on title, description, or category.
    pub search: Option<String>,
    /// Exact category match.
    pub category: Option<String>,
    /// Exact priority match (low, medium, high).
    pub priority: Option<String>,
    /// Sort field (created_at, due_date, priority, title, ...). Unknown
    /// fields sort by created_at.
    pub sort_by: Option<String>,
    /// `asc` or `desc` (default).
    pub order: Option<String>,
}

impl From<TodoListParams> for TodoFilter {
    fn from(p: TodoListParams) -> Self {
        Self {
            completed: p.completed,
            search: p.search,
            category: p.category,
            priority: p.priority,
            sort_by: p.sort_by.as_deref().map(SortField::from_param).unwrap_or_default(),
            order: p.order.as_deref().map(SortOrder::from_param).unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TodoSearchParams {
    /// Search query.
    pub q: String,
}

fn parse_id(id: &str) -> Result<i64, AppError> {
    id.parse::<i64>()
        .map_err(|_| AppError::bad_request(format!("Invalid todo id: {id}")))
}

fn todo_not_found(id: i64) -> AppError {
    AppError::not_found(format!("Todo {id} not found"))
}

// ---------------------------------------------------------------------------
// GET /api/todos
// ---------------------------------------------------------------------------

/// List to-do items with optional filters and sorting.
#[utoipa::path(
    get,
    path = "/api/todos",
    params(TodoListParams),
    responses(
        (status = 200, description = "To-do list", body = Vec<TodoResponse>),
        (status = 400, description = "Invalid query parameter", body = AppError)
    ),
    tag = "todos"
)]
#[tracing::instrument(skip(pool))]
pub async fn list_todos(
    State(pool): State<Pool<Sqlite>>,
    ApiQuery(params): ApiQuery<TodoListParams>,
) -> Result<Json<Vec<TodoResponse>>, AppError> {
    let filter = TodoFilter::from(params);
    let todos = crate::repo::todo::list(&pool, &filter).await?;
    let response: Vec<TodoResponse> = todos.into_iter().map(TodoResponse::from).collect();
    Ok(Json(response))
}

// ---------------------------------------------------------------------------
// GET /api/todos/search
// ---------------------------------------------------------------------------

/// Search to-dos by title, description, or category.
#[utoipa::path(
    get,
    path = "/api/todos/search",
    params(TodoSearchParams),
    responses(
        (status = 200, description = "Matching to-dos", body = Vec<TodoResponse>),
        (status = 400, description = "Missing query", body = AppError)
    ),
    tag = "todos"
)]
#[tracing::instrument(skip(pool))]
pub async fn search_todos(
    State(pool): State<Pool<Sqlite>>,
    ApiQuery(params): ApiQuery<TodoSearchParams>,
) -> Result<Json<Vec<TodoResponse>>, AppError> {
    let todos = crate::repo::todo::search(&pool, &params.q).await?;
    Ok(Json(todos.into_iter().map(TodoResponse::from).collect()))
}

// ---------------------------------------------------------------------------
// GET /api/todos/statistics
// ---------------------------------------------------------------------------

/// Aggregate counts over all to-dos.
#[utoipa::path(
    get,
    path = "/api/todos/statistics",
    responses(
        (status = 200, description = "To-do statistics", body = TodoStatistics)
    ),
    tag = "todos"
)]
#[tracing::instrument(skip(pool))]
pub async fn todo_statistics(
    State(pool): State<Pool<Sqlite>>,
) -> Result<Json<TodoStatistics>, AppError> {
    let stats = crate::repo::todo::statistics(&pool).await?;
    Ok(Json(stats))
}

// ---------------------------------------------------------------------------
// GET /api/categories
// ---------------------------------------------------------------------------

/// Distinct categories in use.
#[utoipa::path(
    get,
    path = "/api/categories",
    responses(
        (status = 200, description = "Category names", body = CategoriesResponse)
    ),
    tag = "todos"
)]
#[tracing::instrument(skip(pool))]
pub async fn list_categories(
    State(pool): State<Pool<Sqlite>>,
) -> Result<Json<CategoriesResponse>, AppError> {
    let categories = crate::repo::todo::categories(&pool).await?;
    Ok(Json(CategoriesResponse { categories }))
}

// ---------------------------------------------------------------------------
// POST /api/todos
// ---------------------------------------------------------------------------

/// Create a new to-do item.
#[utoipa::path(
    post,
    path = "/api/todos",
    request_body = CreateTodoRequest,
    responses(
        (status = 201, description = "To-do created", body = TodoResponse),
        (status = 400, description = "Malformed body", body = AppError),
        (status = 422, description = "Body failed type coercion", body = AppError),
        (status = 500, description = "Persistence failure", body = AppError)
    ),
    tag = "todos"
)]
#[tracing::instrument(skip(pool, body))]
pub async fn create_todo(
    State(pool): State<Pool<Sqlite>>,
    ApiJson(body): ApiJson<CreateTodoRequest>,
) -> Result<(StatusCode, Json<TodoResponse>), AppError> {
    let todo = crate::repo::todo::create(&pool, body).await.map_err(|e| {
        tracing::error!(error = %e, "Error creating todo");
        AppError::internal(format!("Internal server error: {}", e.message))
    })?;

    Ok((StatusCode::CREATED, Json(TodoResponse::from(todo))))
}

// ---------------------------------------------------------------------------
// GET /api/todos/{id}
// ---------------------------------------------------------------------------

/// Get a single to-do item by ID.
#[utoipa::path(
    get,
    path = "/api/todos/{id}",
    params(("id" = i64, Path, description = "Todo ID")),
    responses(
        (status = 200, description = "To-do found", body = TodoResponse),
        (status = 400, description = "Malformed ID", body = AppError),
        (status = 404, description = "Not found", body = AppError)
    ),
    tag = "todos"
)]
#[tracing::instrument(skip(pool))]
pub async fn get_todo(
    State(pool): State<Pool<Sqlite>>,
    Path(id): Path<String>,
) -> Result<Json<TodoResponse>, AppError> {
    let id = parse_id(&id)?;

    let todo = crate::repo::todo::find_by_id(&pool, id)
        .await?
        .ok_or_else(|| todo_not_found(id))?;

    Ok(Json(TodoResponse::from(todo)))
}

// ---------------------------------------------------------------------------
// PUT /api/todos/{id}
// ---------------------------------------------------------------------------

/// Partially update a to-do item. Fields left out of the body keep their
/// current values.
#[utoipa::path(
    put,
    path = "/api/todos/{id}",
    params(("id" = i64, Path, description = "Todo ID")),
    request_body = UpdateTodoRequest,
    responses(
        (status = 200, description = "To-do updated", body = TodoResponse),
        (status = 404, description = "Not found", body = AppError),
        (status = 422, description = "Body failed type coercion", body = AppError)
    ),
    tag = "todos"
)]
#[tracing::instrument(skip(pool, body))]
pub async fn update_todo(
    State(pool): State<Pool<Sqlite>>,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<UpdateTodoRequest>,
) -> Result<Json<TodoResponse>, AppError> {
    let id = parse_id(&id)?;

    let todo = crate::repo::todo::update(&pool, id, body)
        .await?
        .ok_or_else(|| todo_not_found(id))?;

    Ok(Json(TodoResponse::from(todo)))
}

// ---------------------------------------------------------------------------
// DELETE /api/todos/{id}
// ---------------------------------------------------------------------------

/// Delete a to-do item.
#[utoipa::path(
    delete,
    path = "/api/todos/{id}",
    params(("id" = i64, Path, description = "Todo ID")),
    responses(
        (status = 204, description = "To-do deleted"),
        (status = 404, description = "Not found", body = AppError)
    ),
    tag = "todos"
)]
#[tracing::instrument(skip(pool))]
pub async fn delete_todo(
    State(pool): State<Pool<Sqlite>>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let id = parse_id(&id)?;

    if crate::repo::todo::delete(&pool, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(todo_not_found(id))
    }
}
