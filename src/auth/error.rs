use thiserror::Error;

/// Errors crossing the authentication boundary.
///
/// `InvalidCredentials` deliberately carries no cause: unknown identifier,
/// wrong password and inactive account all collapse into it. The cause is
/// logged server-side by the authenticator before the collapse.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Incorrect email or password")]
    InvalidCredentials,

    /// Store unreachable, hashing backend failure or timeout. Retryable.
    #[error("Authentication infrastructure failure: {0}")]
    InfrastructureError(String),

    #[error("Token has expired")]
    TokenExpired,

    #[error("Token signature is invalid")]
    InvalidSignature,

    #[error("Token is malformed: {0}")]
    MalformedToken(String),
}

impl AuthError {
    /// Whether the caller may retry the same request later
    pub fn is_retryable(&self) -> bool {
        matches!(self, AuthError::InfrastructureError(_))
    }
}
