// handlers/public/login.rs - POST {prefix}/login/access-token

use std::collections::HashMap;

use axum::{extract::State, Form};
use serde::{Deserialize, Serialize};

use crate::app::AppState;
use crate::auth::{AuthError, TOKEN_TYPE};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};

/// OAuth2 password-grant form. `username` carries the email.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: &'static str,
    pub expires_in: i64,
}

/// Exchange credentials for a bearer token.
///
/// Unknown email, wrong password and inactive account all produce the same
/// 401. A store outage or a login exceeding the configured timeout is a 503
/// the client may retry.
pub async fn login_access_token(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> ApiResult<TokenResponse> {
    validate_form(&form)?;

    let attempt = state.authenticator.authenticate(&form.username, &form.password);
    let token = match tokio::time::timeout(state.login_timeout, attempt).await {
        Ok(result) => result?,
        Err(_) => {
            tracing::error!(
                "Login for '{}' exceeded {}ms",
                form.username,
                state.login_timeout.as_millis()
            );
            return Err(AuthError::InfrastructureError("login timed out".to_string()).into());
        }
    };

    Ok(ApiResponse::success(TokenResponse {
        expires_in: token.expires_in(),
        access_token: token.access_token,
        token_type: TOKEN_TYPE,
    }))
}

fn validate_form(form: &LoginForm) -> Result<(), ApiError> {
    let mut field_errors = HashMap::new();
    if form.username.trim().is_empty() {
        field_errors.insert("username".to_string(), "This field is required".to_string());
    }
    if form.password.is_empty() {
        field_errors.insert("password".to_string(), "This field is required".to_string());
    }

    if field_errors.is_empty() {
        Ok(())
    } else {
        Err(ApiError::validation_error("Missing required fields", Some(field_errors)))
    }
}
