use std::sync::Arc;
use std::time::Duration;

use axum::{
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::auth::{Authenticator, PasswordHasher, TokenIssuer};
use crate::config::{AppConfig, ConfigError};
use crate::handlers;
use crate::middleware::jwt_auth_middleware;
use crate::store::CredentialStore;

/// Everything a request handler may touch. Built once, read-only afterwards.
#[derive(Clone)]
pub struct AppState {
    pub authenticator: Arc<Authenticator>,
    pub tokens: TokenIssuer,
    pub store: Arc<dyn CredentialStore>,
    pub login_timeout: Duration,
    pub project_name: String,
    pub api_prefix: String,
}

impl AppState {
    /// Validate the configuration and wire the auth core around `store`.
    ///
    /// Computes the dummy digest, so this costs one full hash at the configured cost.
    pub fn from_config(config: &AppConfig, store: Arc<dyn CredentialStore>) -> Result<Self, ConfigError> {
        config.validate()?;

        let security = &config.security;
        let hasher = PasswordHasher::new(security.hash_cost, security.max_concurrent_hashes)?;
        let tokens = TokenIssuer::from_config(security)?;
        let authenticator = Authenticator::new(store.clone(), hasher, tokens.clone());

        Ok(Self {
            authenticator: Arc::new(authenticator),
            tokens,
            store,
            login_timeout: Duration::from_millis(security.login_timeout_ms),
            project_name: config.project_name.clone(),
            api_prefix: config.api_prefix.clone(),
        })
    }
}

pub fn app(state: AppState) -> Router {
    let api = Router::new()
        .route("/health", get(handlers::public::health))
        .route("/login/access-token", post(handlers::public::login_access_token))
        .merge(protected_routes(state.clone()));

    Router::new()
        .route("/", get(handlers::public::root))
        .nest(&state.api_prefix, api)
        .fallback(handlers::not_found)
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn protected_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/auth/whoami", get(handlers::protected::whoami))
        .route_layer(from_fn_with_state(state, jwt_auth_middleware))
}
