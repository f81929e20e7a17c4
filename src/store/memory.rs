use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{CredentialRecord, CredentialStore, StoreError};

/// Process-local credential store for development and tests.
///
/// `set_unavailable(true)` makes every call fail the way an unreachable
/// database would.
#[derive(Debug, Default)]
pub struct InMemoryCredentialStore {
    records: RwLock<HashMap<String, CredentialRecord>>,
    unavailable: AtomicBool,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, record: CredentialRecord) {
        let mut records = self.records.write().await;
        records.insert(record.identifier.clone(), record);
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("in-memory store switched off".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn lookup(&self, identifier: &str) -> Result<Option<CredentialRecord>, StoreError> {
        self.check_available()?;
        Ok(self.records.read().await.get(identifier).cloned())
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        self.check_available()
    }
}
