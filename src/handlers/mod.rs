// handlers/mod.rs - Two-tier handler layout
//
// Public (no auth) -> Protected (bearer token verified by middleware)
pub mod protected;
pub mod public;

use crate::error::ApiError;

/// Fallback for unknown routes, keeps the JSON error envelope
pub async fn not_found() -> ApiError {
    ApiError::not_found("Resource not found")
}
