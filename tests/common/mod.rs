#![allow(dead_code)]

use std::sync::Arc;

use anyhow::{Context, Result};
use kitsune_api::app::{app, AppState};
use kitsune_api::config::AppConfig;
use kitsune_api::store::{CredentialRecord, InMemoryCredentialStore};
use tokio::task::JoinHandle;

pub const TEST_SECRET: &str = "integration-test-secret";

/// Router served in-process over a real TCP socket, backed by an in-memory store
pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    pub state: AppState,
    pub store: Arc<InMemoryCredentialStore>,
    handle: JoinHandle<()>,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn api(&self, path: &str) -> String {
        format!("{}{}{}", self.base_url, self.state.api_prefix, path)
    }

    pub async fn add_user(&self, email: &str, password: &str, is_active: bool) -> Result<()> {
        let password_hash = self.state.authenticator.hasher().hash(password)?;
        self.store
            .insert(CredentialRecord {
                identifier: email.to_string(),
                password_hash,
                is_active,
            })
            .await;
        Ok(())
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<reqwest::Response> {
        let res = reqwest::Client::new()
            .post(self.api("/login/access-token"))
            .form(&[("username", username), ("password", password)])
            .send()
            .await?;
        Ok(res)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

pub fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.security.secret_key = TEST_SECRET.to_string();
    config.security.hash_cost = 4;
    config.security.max_concurrent_hashes = 4;
    config
}

pub async fn spawn_server() -> Result<TestServer> {
    spawn_server_with(test_config()).await
}

pub async fn spawn_server_with(config: AppConfig) -> Result<TestServer> {
    let store = Arc::new(InMemoryCredentialStore::new());
    let state = AppState::from_config(&config, store.clone())?;

    // Pick an unused port for isolation
    let port = portpicker::pick_unused_port().context("failed to pick free port")?;
    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
        .await
        .context("failed to bind test listener")?;

    let router = app(state.clone());
    let handle = tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });

    Ok(TestServer {
        port,
        base_url: format!("http://127.0.0.1:{}", port),
        state,
        store,
        handle,
    })
}
