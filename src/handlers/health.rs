use axum::Json;
use serde::Serialize;

/// Body of the health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    pub message: &'static str,
}

/// Reports that the API is up.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        message: "Todo API is running",
    })
}
