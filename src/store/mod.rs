pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::database::DatabaseError;

pub use memory::InMemoryCredentialStore;
pub use postgres::PgCredentialStore;

/// Stored login identity. Owned by the store; the authenticator only reads it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct CredentialRecord {
    pub identifier: String,
    pub password_hash: String,
    pub is_active: bool,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error("Credential store unavailable: {0}")]
    Unavailable(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        StoreError::Database(DatabaseError::Sqlx(err))
    }
}

/// Lookup-by-identifier over credential records
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn lookup(&self, identifier: &str) -> Result<Option<CredentialRecord>, StoreError>;

    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
