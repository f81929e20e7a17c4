use axum::{extract::State, http::StatusCode};
use serde_json::{json, Value};

use crate::app::AppState;
use crate::middleware::ApiResponse;

/// GET {prefix}/health - liveness plus credential store reachability
pub async fn health(State(state): State<AppState>) -> ApiResponse<Value> {
    let now = chrono::Utc::now();

    match state.store.health_check().await {
        Ok(()) => ApiResponse::success(json!({
            "status": "ok",
            "message": "System is healthy",
            "timestamp": now,
        })),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            ApiResponse::with_status(
                json!({
                    "status": "degraded",
                    "message": "Credential store unavailable",
                    "timestamp": now,
                }),
                StatusCode::SERVICE_UNAVAILABLE,
            )
        }
    }
}
