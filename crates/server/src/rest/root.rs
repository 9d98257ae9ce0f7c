use axum::Json;
use shared_types::MessageResponse;

/// Liveness banner.
#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "API is running", body = MessageResponse)
    ),
    tag = "health"
)]
pub async fn root() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "Todo API is running".to_string(),
        status: "ok".to_string(),
    })
}
