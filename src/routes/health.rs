use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

use crate::AppState;

/// Liveness plus a cheap round trip to the store.
#[axum::debug_handler]
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    match state.store.stats().await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({ "status": "ok", "store": "up" })),
        ),
        Err(err) => {
            tracing::warn!(error = %err, "health check could not reach the store");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "degraded", "store": "down" })),
            )
        }
    }
}
