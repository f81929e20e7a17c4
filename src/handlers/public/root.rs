use axum::extract::State;
use serde_json::{json, Value};

use crate::app::AppState;
use crate::middleware::ApiResponse;

/// GET / - service identification
pub async fn root(State(state): State<AppState>) -> ApiResponse<Value> {
    ApiResponse::success(json!({
        "name": state.project_name,
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "health": format!("{}/health", state.api_prefix),
            "login": format!("{}/login/access-token", state.api_prefix),
            "whoami": format!("{}/auth/whoami", state.api_prefix),
        }
    }))
}
