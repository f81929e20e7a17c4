use std::sync::Arc;

use thiserror::Error;
use tokio::sync::Semaphore;

/// bcrypt only reads the first 72 bytes of its input
pub const MAX_PASSWORD_BYTES: usize = 72;

pub const MIN_COST: u32 = 4;
pub const MAX_COST: u32 = 31;

/// Fixed input for the dummy digest. Its value is irrelevant; only the cost matters.
const DUMMY_PASSWORD: &str = "kitsune::dummy-credential";

#[derive(Debug, Error)]
pub enum HashingError {
    #[error("Password is {len} bytes; at most {max} bytes are supported")]
    InputTooLong { len: usize, max: usize },

    #[error("Hash cost {0} is outside the supported range")]
    InvalidCost(u32),

    #[error("Hashing backend failure: {0}")]
    Backend(String),
}

impl From<bcrypt::BcryptError> for HashingError {
    fn from(err: bcrypt::BcryptError) -> Self {
        HashingError::Backend(err.to_string())
    }
}

/// Salted, deliberately slow password hashing (bcrypt).
///
/// The async methods run the computation on the blocking pool and hold a
/// semaphore permit while doing so, which bounds how many hashes can be in
/// flight at once. Cloning shares the permits and the dummy digest.
#[derive(Clone)]
pub struct PasswordHasher {
    cost: u32,
    permits: Arc<Semaphore>,
    dummy_digest: Arc<str>,
}

impl std::fmt::Debug for PasswordHasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordHasher")
            .field("cost", &self.cost)
            .field("available_permits", &self.permits.available_permits())
            .finish()
    }
}

impl PasswordHasher {
    /// Build a hasher and precompute the dummy digest at the same cost as real hashes
    pub fn new(cost: u32, max_concurrent: usize) -> Result<Self, HashingError> {
        if !(MIN_COST..=MAX_COST).contains(&cost) {
            return Err(HashingError::InvalidCost(cost));
        }

        let dummy_digest = bcrypt::hash(DUMMY_PASSWORD, cost)?;

        Ok(Self {
            cost,
            permits: Arc::new(Semaphore::new(max_concurrent.max(1))),
            dummy_digest: Arc::from(dummy_digest),
        })
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// Digest used on the "no such identifier" path
    pub fn dummy_digest(&self) -> &str {
        &self.dummy_digest
    }

    /// Hash `plaintext` with a fresh salt. Over-long input is rejected, never truncated.
    pub fn hash(&self, plaintext: &str) -> Result<String, HashingError> {
        check_length(plaintext)?;
        Ok(bcrypt::hash(plaintext, self.cost)?)
    }

    /// Recompute with the salt embedded in `digest` and compare in constant time.
    ///
    /// A mismatch is `Ok(false)`. `Err` means the digest itself is unusable.
    pub fn verify(&self, plaintext: &str, digest: &str) -> Result<bool, HashingError> {
        let matched = bcrypt::verify(plaintext, digest)?;

        // bcrypt would silently compare only the first 72 bytes
        Ok(matched && plaintext.len() <= MAX_PASSWORD_BYTES)
    }

    pub async fn hash_bounded(&self, plaintext: &str) -> Result<String, HashingError> {
        check_length(plaintext)?;

        let hasher = self.clone();
        let plaintext = plaintext.to_owned();
        self.run_blocking(move || hasher.hash(&plaintext)).await
    }

    pub async fn verify_bounded(&self, plaintext: &str, digest: &str) -> Result<bool, HashingError> {
        let hasher = self.clone();
        let plaintext = plaintext.to_owned();
        let digest = digest.to_owned();
        self.run_blocking(move || hasher.verify(&plaintext, &digest)).await
    }

    /// The permit moves into the blocking job, so it is held for as long as
    /// the computation runs, even if the awaiting future is dropped first.
    async fn run_blocking<T, F>(&self, job: F) -> Result<T, HashingError>
    where
        T: Send + 'static,
        F: FnOnce() -> Result<T, HashingError> + Send + 'static,
    {
        let permit = self
            .permits
            .clone()
            .acquire_owned()
            .await
            .map_err(|e| HashingError::Backend(format!("hashing pool closed: {}", e)))?;

        tokio::task::spawn_blocking(move || {
            let _permit = permit;
            job()
        })
        .await
        .map_err(|e| HashingError::Backend(format!("hashing task failed: {}", e)))?
    }
}

fn check_length(plaintext: &str) -> Result<(), HashingError> {
    if plaintext.len() > MAX_PASSWORD_BYTES {
        return Err(HashingError::InputTooLong {
            len: plaintext.len(),
            max: MAX_PASSWORD_BYTES,
        });
    }
    Ok(())
}
