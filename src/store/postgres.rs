use async_trait::async_trait;
use sqlx::PgPool;

use super::{CredentialRecord, CredentialStore, StoreError};

const LOOKUP_BY_EMAIL: &str = r#"
    SELECT
        email AS identifier,
        hashed_password AS password_hash,
        COALESCE(is_active, TRUE) AS is_active
    FROM users
    WHERE email = $1
"#;

/// Credential store backed by the `users` table
#[derive(Debug, Clone)]
pub struct PgCredentialStore {
    pool: PgPool,
}

impl PgCredentialStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CredentialStore for PgCredentialStore {
    async fn lookup(&self, identifier: &str) -> Result<Option<CredentialRecord>, StoreError> {
        let record = sqlx::query_as::<_, CredentialRecord>(LOOKUP_BY_EMAIL)
            .bind(identifier)
            .fetch_optional(&self.pool)
            .await?;

        Ok(record)
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
