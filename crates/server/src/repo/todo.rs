use chrono::{NaiveDateTime, Utc};
use shared_types::{
    AppError, CreateTodoRequest, SortField, SortOrder, Todo, TodoStatistics, UpdateTodoRequest,
    DEFAULT_PRIORITY, PRIORITY_HIGH, PRIORITY_LOW, PRIORITY_MEDIUM,
};
use sqlx::{Pool, QueryBuilder, Sqlite, SqliteConnection};

use crate::error_convert::SqlxErrorExt;

const TODO_COLUMNS: &str =
    "id, title, description, completed, priority, category, due_date, created_at";

/// Filters and ordering for a to-do listing. Every filter is optional and
/// present filters combine with AND.
#[derive(Debug, Clone, Default)]
pub struct TodoFilter {
    pub completed: Option<bool>,
    pub search: Option<String>,
    pub category: Option<String>,
    pub priority: Option<String>,
    pub sort_by: SortField,
    pub order: SortOrder,
}

/// Case-insensitive regex matching `term` literally anywhere in a value.
///
/// SQLite's `lower()` and `LIKE` only fold ASCII, so matching goes through
/// the `REGEXP` function registered on every connection in `db::create_pool`.
fn contains_pattern(term: &str) -> String {
    format!("(?i){}", regex::escape(term))
}

/// Append the title/description/category substring match.
fn push_search(qb: &mut QueryBuilder<'_, Sqlite>, term: &str) {
    let pattern = contains_pattern(term);
    qb.push("(title REGEXP ")
        .push_bind(pattern.clone())
        .push(" OR COALESCE(description, '') REGEXP ")
        .push_bind(pattern.clone())
        .push(" OR COALESCE(category, '') REGEXP ")
        .push_bind(pattern)
        .push(")");
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// List to-dos matching the filter in the requested order.
pub async fn list(pool: &Pool<Sqlite>, filter: &TodoFilter) -> Result<Vec<Todo>, AppError> {
    let mut qb = QueryBuilder::<Sqlite>::new(format!("SELECT {TODO_COLUMNS} FROM todos WHERE 1 = 1"));

    if let Some(completed) = filter.completed {
        qb.push(" AND completed = ").push_bind(completed);
    }
    if let Some(term) = non_empty(&filter.search) {
        qb.push(" AND ");
        push_search(&mut qb, term);
    }
    if let Some(category) = non_empty(&filter.category) {
        qb.push(" AND category = ").push_bind(category.to_string());
    }
    if let Some(priority) = non_empty(&filter.priority) {
        qb.push(" AND priority = ").push_bind(priority.to_string());
    }

    // Column and direction come from closed enums, never from raw input.
    let direction = filter.order.keyword();
    qb.push(format!(
        " ORDER BY {} {direction}, id {direction}",
        filter.sort_by.column()
    ));

    let rows = qb
        .build_query_as::<Todo>()
        .fetch_all(pool)
        .await
        .map_err(SqlxErrorExt::into_app_error)?;

    Ok(rows)
}

/// Search to-dos by title, description, or category.
pub async fn search(pool: &Pool<Sqlite>, term: &str) -> Result<Vec<Todo>, AppError> {
    let mut qb = QueryBuilder::<Sqlite>::new(format!("SELECT {TODO_COLUMNS} FROM todos WHERE "));
    push_search(&mut qb, term);
    qb.push(" ORDER BY created_at DESC, id DESC");

    let rows = qb
        .build_query_as::<Todo>()
        .fetch_all(pool)
        .await
        .map_err(SqlxErrorExt::into_app_error)?;

    Ok(rows)
}

#[derive(sqlx::FromRow)]
struct StatisticsRow {
    total: i64,
    completed: i64,
    high_priority: i64,
    medium_priority: i64,
    low_priority: i64,
    overdue: i64,
}

/// Aggregate counts, evaluated against `now` (naive UTC).
pub async fn statistics_at(
    pool: &Pool<Sqlite>,
    now: NaiveDateTime,
) -> Result<TodoStatistics, AppError> {
    let row = sqlx::query_as::<_, StatisticsRow>(
        r#"
        SELECT
            COUNT(*) AS total,
            COALESCE(SUM(CASE WHEN completed THEN 1 ELSE 0 END), 0) AS completed,
            COALESCE(SUM(CASE WHEN NOT completed AND priority = ?1 THEN 1 ELSE 0 END), 0) AS high_priority,
            COALESCE(SUM(CASE WHEN NOT completed AND priority = ?2 THEN 1 ELSE 0 END), 0) AS medium_priority,
            COALESCE(SUM(CASE WHEN NOT completed AND priority = ?3 THEN 1 ELSE 0 END), 0) AS low_priority,
            COALESCE(SUM(CASE WHEN NOT completed AND due_date IS NOT NULL AND due_date < ?4 THEN 1 ELSE 0 END), 0) AS overdue
        FROM todos
        "#,
    )
    .bind(PRIORITY_HIGH)
    .bind(PRIORITY_MEDIUM)
    .bind(PRIORITY_LOW)
    .bind(now)
    .fetch_one(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)?;

    Ok(TodoStatistics {
        total: row.total,
        completed: row.completed,
        active: row.total - row.completed,
        high_priority: row.high_priority,
        medium_priority: row.medium_priority,
        low_priority: row.low_priority,
        overdue: row.overdue,
    })
}

/// Aggregate counts as of the current instant.
pub async fn statistics(pool: &Pool<Sqlite>) -> Result<TodoStatistics, AppError> {
    statistics_at(pool, Utc::now().naive_utc()).await
}

/// Distinct non-empty categories.
pub async fn categories(pool: &Pool<Sqlite>) -> Result<Vec<String>, AppError> {
    let rows = sqlx::query_scalar::<_, String>(
        r#"
        SELECT DISTINCT category
        FROM todos
        WHERE category IS NOT NULL AND category <> ''
        ORDER BY category
        "#,
    )
    .fetch_all(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)?;

    Ok(rows)
}

async fn find_in(conn: &mut SqliteConnection, id: i64) -> Result<Option<Todo>, sqlx::Error> {
    sqlx::query_as::<_, Todo>(&format!("SELECT {TODO_COLUMNS} FROM todos WHERE id = ?1"))
        .bind(id)
        .fetch_optional(conn)
        .await
}

/// Find a to-do by ID.
pub async fn find_by_id(pool: &Pool<Sqlite>, id: i64) -> Result<Option<Todo>, AppError> {
    let mut conn = pool.acquire().await.map_err(SqlxErrorExt::into_app_error)?;
    find_in(&mut conn, id)
        .await
        .map_err(SqlxErrorExt::into_app_error)
}

async fn insert(conn: &mut SqliteConnection, req: CreateTodoRequest) -> Result<Todo, sqlx::Error> {
    sqlx::query_as::<_, Todo>(&format!(
        r#"
        INSERT INTO todos (title, description, completed, priority, category, due_date, created_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
        RETURNING {TODO_COLUMNS}
        "#
    ))
    .bind(req.title)
    .bind(req.description)
    .bind(req.completed.unwrap_or(false))
    .bind(req.priority.unwrap_or_else(|| DEFAULT_PRIORITY.to_string()))
    .bind(req.category)
    .bind(req.due_date)
    .bind(Utc::now().naive_utc())
    .fetch_one(conn)
    .await
}

/// Insert a new to-do. The insert runs in its own transaction and is rolled
/// back if any step fails.
pub async fn create(pool: &Pool<Sqlite>, req: CreateTodoRequest) -> Result<Todo, AppError> {
    let mut tx = pool.begin().await.map_err(SqlxErrorExt::into_app_error)?;

    match insert(&mut tx, req).await {
        Ok(todo) => {
            tx.commit().await.map_err(SqlxErrorExt::into_app_error)?;
            tracing::info!(todo_id = todo.id, "Todo created");
            Ok(todo)
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to create todo, rolling back");
            if let Err(rollback_err) = tx.rollback().await {
                tracing::error!(error = %rollback_err, "Rollback failed");
            }
            Err(e.into_app_error())
        }
    }
}

/// Update a to-do using read-modify-write. Returns `None` if the ID does not
/// exist. Only fields present in `req` change.
pub async fn update(
    pool: &Pool<Sqlite>,
    id: i64,
    req: UpdateTodoRequest,
) -> Result<Option<Todo>, AppError> {
    let mut tx = pool.begin().await.map_err(SqlxErrorExt::into_app_error)?;

    // Fetch existing
    let existing = match find_in(&mut tx, id)
        .await
        .map_err(SqlxErrorExt::into_app_error)?
    {
        Some(t) => t,
        None => return Ok(None),
    };

    if req.is_empty() {
        return Ok(Some(existing));
    }

    let merged = req.apply_to(existing);

    let row = sqlx::query_as::<_, Todo>(&format!(
        r#"
        UPDATE todos SET
            title = ?2, description = ?3, completed = ?4,
            priority = ?5, category = ?6, due_date = ?7
        WHERE id = ?1
        RETURNING {TODO_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(merged.title)
    .bind(merged.description)
    .bind(merged.completed)
    .bind(merged.priority)
    .bind(merged.category)
    .bind(merged.due_date)
    .fetch_optional(&mut *tx)
    .await
    .map_err(SqlxErrorExt::into_app_error)?;

    tx.commit().await.map_err(SqlxErrorExt::into_app_error)?;

    Ok(row)
}

/// Delete a to-do. Returns true if a row was actually deleted.
pub async fn delete(pool: &Pool<Sqlite>, id: i64) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM todos WHERE id = ?1")
        .bind(id)
        .execute(pool)
        .await
        .map_err(SqlxErrorExt::into_app_error)?;

    Ok(result.rows_affected() > 0)
}
