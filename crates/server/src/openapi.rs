use axum::Router;
use shared_types::{
    AppError, AppErrorKind, CategoriesResponse, CreateTodoRequest, MessageResponse, TodoResponse,
    TodoStatistics, UpdateTodoRequest,
};
use sqlx::{Pool, Sqlite};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

use crate::config::ServerConfig;
use crate::db::AppState;
use crate::{health, rest};

#[derive(OpenApi)]
#[openapi(
    paths(
        rest::root::root,
        // TODOs
        rest::todo::list_todos,
        rest::todo::search_todos,
        rest::todo::todo_statistics,
        rest::todo::list_categories,
        rest::todo::create_todo,
        rest::todo::get_todo,
        rest::todo::update_todo,
        rest::todo::delete_todo,
        // Health
        health::health_check,
    ),
    components(schemas(
        AppError, AppErrorKind, MessageResponse,
        // Todo schemas
        TodoResponse, CreateTodoRequest, UpdateTodoRequest, TodoStatistics, CategoriesResponse,
        health::HealthResponse,
    )),
    tags(
        (name = "todos", description = "Todo management"),
        (name = "health", description = "Liveness and health endpoints")
    ),
    info(
        title = "Todo API",
        description = "Task tracking API with filtering, search and statistics",
        version = "1.0.0"
    )
)]
pub struct ApiDoc;

/// Build the full application router: REST API, `/health`, API docs at
/// `/docs`, CORS per the configured policy, and request tracing.
pub fn api_router(pool: Pool<Sqlite>, config: &ServerConfig) -> Router {
    let state = AppState { pool };

    let mut router = Router::new()
        .merge(rest::api_router())
        .route("/health", axum::routing::get(health::health_check))
        .with_state(state)
        .merge(Scalar::with_url("/docs", ApiDoc::openapi()));

    if config.features.telemetry {
        router = router.layer(crate::telemetry::OtelTraceLayer);
    }

    router
        .layer(TraceLayer::new_for_http())
        .layer(crate::cors::cors_layer(&config.cors))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}
