use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::common::{format_timestamp, non_null, optional_timestamp, patch_field, patch_timestamp};

pub const PRIORITY_LOW: &str = "low";
pub const PRIORITY_MEDIUM: &str = "medium";
pub const PRIORITY_HIGH: &str = "high";

/// Priority applied when a create request leaves it out.
pub const DEFAULT_PRIORITY: &str = PRIORITY_MEDIUM;

// ---------------------------------------------------------------------------
// Domain Struct
// ---------------------------------------------------------------------------

/// A to-do item as stored in the `todos` table.
///
/// Timestamps are naive UTC.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "server", derive(sqlx::FromRow))]
pub struct Todo {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
    pub priority: String,
    pub category: Option<String>,
    pub due_date: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
}

// ---------------------------------------------------------------------------
// Request/Response DTOs
// ---------------------------------------------------------------------------

/// API response for a to-do item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct TodoResponse {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
    pub priority: String,
    pub category: Option<String>,
    pub due_date: Option<String>,
    pub created_at: String,
}

impl From<Todo> for TodoResponse {
    fn from(t: Todo) -> Self {
        Self {
            id: t.id,
            title: t.title,
            description: t.description,
            completed: t.completed,
            priority: t.priority,
            category: t.category,
            due_date: t.due_date.as_ref().map(format_timestamp),
            created_at: format_timestamp(&t.created_at),
        }
    }
}

/// Request body for creating a new to-do item.
#[derive(Debug, Clone, Default, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CreateTodoRequest {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Defaults to `false`.
    #[serde(default)]
    pub completed: Option<bool>,
    /// Defaults to `"medium"`.
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "optional_timestamp")]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<String>, example = "2025-06-30T17:00:00"))]
    pub due_date: Option<NaiveDateTime>,
}

/// Request body for a partial update.
///
/// Only fields present in the JSON body are applied. Nullable columns use a
/// double option so `"category": null` clears the value while an omitted
/// `category` leaves it untouched. `null` for `title`, `completed` or
/// `priority` is rejected.
#[derive(Debug, Clone, Default, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct UpdateTodoRequest {
    #[serde(default, deserialize_with = "non_null")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "patch_field")]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<String>))]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "non_null")]
    pub completed: Option<bool>,
    #[serde(default, deserialize_with = "non_null")]
    pub priority: Option<String>,
    #[serde(default, deserialize_with = "patch_field")]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<String>))]
    pub category: Option<Option<String>>,
    #[serde(default, deserialize_with = "patch_timestamp")]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<String>))]
    pub due_date: Option<Option<NaiveDateTime>>,
}

impl UpdateTodoRequest {
    /// True when the body carried no recognised fields.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.completed.is_none()
            && self.priority.is_none()
            && self.category.is_none()
            && self.due_date.is_none()
    }

    /// Merge the supplied fields onto an existing record.
    pub fn apply_to(self, mut todo: Todo) -> Todo {
        if let Some(title) = self.title {
            todo.title = title;
        }
        if let Some(description) = self.description {
            todo.description = description;
        }
        if let Some(completed) = self.completed {
            todo.completed = completed;
        }
        if let Some(priority) = self.priority {
            todo.priority = priority;
        }
        if let Some(category) = self.category {
            todo.category = category;
        }
        if let Some(due_date) = self.due_date {
            todo.due_date = due_date;
        }
        todo
    }
}

// ---------------------------------------------------------------------------
// Sorting
// ---------------------------------------------------------------------------

/// Column a to-do listing can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    Id,
    Title,
    Description,
    Completed,
    Priority,
    Category,
    DueDate,
    #[default]
    CreatedAt,
}

impl SortField {
    /// Resolve a `sort_by` parameter. Unknown names fall back to
    /// `created_at` rather than failing.
    pub fn from_param(raw: &str) -> Self {
        match raw.trim() {
            "id" => SortField::Id,
            "title" => SortField::Title,
            "description" => SortField::Description,
            "completed" => SortField::Completed,
            "priority" => SortField::Priority,
            "category" => SortField::Category,
            "due_date" => SortField::DueDate,
            _ => SortField::CreatedAt,
        }
    }

    pub fn column(self) -> &'static str {
        match self {
            SortField::Id => "id",
            SortField::Title => "title",
            SortField::Description => "description",
            SortField::Completed => "completed",
            SortField::Priority => "priority",
            SortField::Category => "category",
            SortField::DueDate => "due_date",
            SortField::CreatedAt => "created_at",
        }
    }
}

/// Sort direction. Only the literal `asc` yields ascending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn from_param(raw: &str) -> Self {
        if raw == "asc" {
            SortOrder::Asc
        } else {
            SortOrder::Desc
        }
    }

    pub fn keyword(self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

// ---------------------------------------------------------------------------
// Aggregates
// ---------------------------------------------------------------------------

/// Counts returned by `GET /api/todos/statistics`.
///
/// Priority buckets and `overdue` only count incomplete todos.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct TodoStatistics {
    pub total: i64,
    pub completed: i64,
    pub active: i64,
    pub high_priority: i64,
    pub medium_priority: i64,
    pub low_priority: i64,
    pub overdue: i64,
}

/// Response for `GET /api/categories`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CategoriesResponse {
    pub categories: Vec<String>,
}
