use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use sqlx::{Pool, Sqlite};
use std::sync::OnceLock;
use std::time::Instant;

static START_TIME: OnceLock<Instant> = OnceLock::new();

/// Record the application start time. Call once during startup.
pub fn record_start_time() {
    START_TIME.get_or_init(Instant::now);
}

/// Health check response.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct HealthResponse {
    /// `ok` when the store answers, `degraded` otherwise.
    pub status: String,
    pub db: String,
    pub uptime_seconds: u64,
    pub version: String,
}

impl HealthResponse {
    fn from_probe(probe: Result<i64, sqlx::Error>) -> Self {
        let (status, db) = match probe {
            Ok(_) => ("ok", "connected".to_string()),
            Err(e) => ("degraded", format!("error: {e}")),
        };

        Self {
            status: status.to_string(),
            db,
            uptime_seconds: START_TIME.get().map(|t| t.elapsed().as_secs()).unwrap_or(0),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Health check handler. Always answers 200; a store failure shows up in
/// `status` and `db`.
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service health", body = HealthResponse)
    ),
    tag = "health"
)]
pub async fn health_check(State(pool): State<Pool<Sqlite>>) -> Json<HealthResponse> {
    let probe = sqlx::query_scalar::<_, i64>("SELECT 1").fetch_one(&pool).await;
    Json(HealthResponse::from_probe(probe))
}
