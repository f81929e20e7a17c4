use std::sync::Arc;

use chrono::Duration;
use jsonwebtoken::Algorithm;

use crate::auth::{Authenticator, PasswordHasher, TokenIssuer};
use crate::store::{CredentialRecord, InMemoryCredentialStore};

pub const TEST_SECRET: &[u8] = b"kitsune-test-secret";

/// Authenticator wired to an in-memory store, cheap hashing and a test key
pub struct TestContext {
    pub store: Arc<InMemoryCredentialStore>,
    pub authenticator: Authenticator,
}

impl TestContext {
    pub async fn new() -> Self {
        Self::with_cost(crate::auth::password::MIN_COST).await
    }

    pub async fn with_cost(cost: u32) -> Self {
        let store = Arc::new(InMemoryCredentialStore::new());
        let hasher = PasswordHasher::new(cost, 4).expect("test hasher");
        let tokens = TokenIssuer::new(TEST_SECRET, Algorithm::HS256, Duration::minutes(30)).expect("test issuer");

        Self {
            authenticator: Authenticator::new(store.clone(), hasher, tokens),
            store,
        }
    }

    /// Register a credential the way the (out of scope) registration flow would
    pub async fn add_user(&self, identifier: &str, password: &str, is_active: bool) {
        let password_hash = self.authenticator.hasher().hash(password).expect("hash test password");
        self.store
            .insert(CredentialRecord {
                identifier: identifier.to_string(),
                password_hash,
                is_active,
            })
            .await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::CredentialStore;

    #[tokio::test]
    async fn add_user_stores_a_verifiable_hash() {
        let ctx = TestContext::new().await;
        ctx.add_user("a@b.com", "Secr3t!", true).await;

        let record = ctx.store.lookup("a@b.com").await.unwrap().unwrap();
        assert_ne!(record.password_hash, "Secr3t!");
        assert!(ctx.authenticator.hasher().verify("Secr3t!", &record.password_hash).unwrap());
    }
}
