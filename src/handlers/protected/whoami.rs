use axum::Extension;

use crate::middleware::{ApiResponse, AuthUser};

/// GET {prefix}/auth/whoami - claims of the presented token.
///
/// No account lookup happens here: tokens are unrevocable and stay valid
/// until expiry even if the account is deactivated afterwards.
pub async fn whoami(Extension(user): Extension<AuthUser>) -> ApiResponse<AuthUser> {
    ApiResponse::success(user)
}
