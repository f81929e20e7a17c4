use std::sync::Arc;

use tracing::{error, info, warn};

use super::error::AuthError;
use super::password::PasswordHasher;
use super::token::{SessionToken, TokenIssuer};
use crate::store::{CredentialRecord, CredentialStore};

/// Internal reason for a rejection. Logged, never returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RejectReason {
    UnknownIdentifier,
    WrongPassword,
    Inactive,
}

impl RejectReason {
    fn as_str(self) -> &'static str {
        match self {
            RejectReason::UnknownIdentifier => "unknown identifier",
            RejectReason::WrongPassword => "wrong password",
            RejectReason::Inactive => "inactive account",
        }
    }
}

enum Decision {
    Issue(CredentialRecord),
    Reject(RejectReason),
}

/// Credential verification and session token issuance.
///
/// Every attempt performs exactly one password verification, against the
/// stored digest or against the dummy digest when the identifier is unknown,
/// so both failure paths cost the same wall-clock time.
pub struct Authenticator {
    store: Arc<dyn CredentialStore>,
    hasher: PasswordHasher,
    tokens: TokenIssuer,
}

impl Authenticator {
    pub fn new(store: Arc<dyn CredentialStore>, hasher: PasswordHasher, tokens: TokenIssuer) -> Self {
        Self { store, hasher, tokens }
    }

    pub fn hasher(&self) -> &PasswordHasher {
        &self.hasher
    }

    pub fn tokens(&self) -> &TokenIssuer {
        &self.tokens
    }

    pub async fn authenticate(&self, identifier: &str, plaintext: &str) -> Result<SessionToken, AuthError> {
        // LOOKUP: never short-circuits on a miss
        let record = self.store.lookup(identifier).await.map_err(|e| {
            error!("Credential lookup failed for '{}': {}", identifier, e);
            AuthError::InfrastructureError("credential store unavailable".to_string())
        })?;

        // VERIFY
        let decision = match record {
            Some(record) => {
                let matched = self
                    .hasher
                    .verify_bounded(plaintext, &record.password_hash)
                    .await
                    .map_err(|e| {
                        error!("Password verification failed for '{}': {}", identifier, e);
                        AuthError::InfrastructureError("password verification unavailable".to_string())
                    })?;

                if !matched {
                    Decision::Reject(RejectReason::WrongPassword)
                } else if !record.is_active {
                    Decision::Reject(RejectReason::Inactive)
                } else {
                    Decision::Issue(record)
                }
            }
            None => {
                // Result discarded; only the time spent matters
                let _ = self
                    .hasher
                    .verify_bounded(plaintext, self.hasher.dummy_digest())
                    .await;
                Decision::Reject(RejectReason::UnknownIdentifier)
            }
        };

        match decision {
            Decision::Issue(record) => {
                let token = self.tokens.issue(&record.identifier)?;
                info!("Issued session token for '{}' (exp={})", record.identifier, token.claims.exp);
                Ok(token)
            }
            Decision::Reject(reason) => {
                warn!("Rejected login for '{}': {}", identifier, reason.as_str());
                Err(AuthError::InvalidCredentials)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use super::*;
    use crate::testing::TestContext;

    #[tokio::test]
    async fn unknown_identifier_is_rejected() {
        let ctx = TestContext::new().await;

        let result = ctx.authenticator.authenticate("a@b.com", "x").await;
        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn correct_password_issues_verifiable_token() {
        let ctx = TestContext::new().await;
        ctx.add_user("a@b.com", "Secr3t!", true).await;

        let before = chrono::Utc::now().timestamp();
        let token = ctx.authenticator.authenticate("a@b.com", "Secr3t!").await.unwrap();
        let after = chrono::Utc::now().timestamp();

        assert_eq!(token.subject(), "a@b.com");
        let iat = token.claims.iat.unwrap();
        assert!(iat >= before && iat <= after);
        assert_eq!(token.claims.exp, iat + 30 * 60);

        let claims = ctx.authenticator.tokens().verify(&token.access_token).unwrap();
        assert_eq!(claims.sub, "a@b.com");
    }

    #[tokio::test]
    async fn wrong_password_is_rejected() {
        let ctx = TestContext::new().await;
        ctx.add_user("a@b.com", "Secr3t!", true).await;

        let result = ctx.authenticator.authenticate("a@b.com", "secret").await;
        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn inactive_account_with_correct_password_is_rejected() {
        let ctx = TestContext::new().await;
        ctx.add_user("a@b.com", "Secr3t!", false).await;

        let result = ctx.authenticator.authenticate("a@b.com", "Secr3t!").await;
        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn rejection_causes_are_indistinguishable() {
        let ctx = TestContext::new().await;
        ctx.add_user("active@b.com", "Secr3t!", true).await;
        ctx.add_user("inactive@b.com", "Secr3t!", false).await;

        let outcomes = [
            ctx.authenticator.authenticate("nobody@b.com", "Secr3t!").await,
            ctx.authenticator.authenticate("active@b.com", "wrong").await,
            ctx.authenticator.authenticate("inactive@b.com", "Secr3t!").await,
        ];

        let messages: Vec<String> = outcomes
            .into_iter()
            .map(|r| r.unwrap_err().to_string())
            .collect();
        assert!(messages.iter().all(|m| m == &messages[0]), "{:?}", messages);
    }

    #[tokio::test]
    async fn store_outage_is_infrastructure_error() {
        let ctx = TestContext::new().await;
        ctx.add_user("a@b.com", "Secr3t!", true).await;
        ctx.store.set_unavailable(true);

        let err = ctx.authenticator.authenticate("a@b.com", "Secr3t!").await.unwrap_err();
        assert!(matches!(err, AuthError::InfrastructureError(_)));
        assert!(err.is_retryable());
        assert!(!AuthError::InvalidCredentials.is_retryable());
    }

    #[tokio::test]
    async fn corrupt_stored_digest_is_infrastructure_error() {
        let ctx = TestContext::new().await;
        ctx.store
            .insert(CredentialRecord {
                identifier: "a@b.com".to_string(),
                password_hash: "garbage".to_string(),
                is_active: true,
            })
            .await;

        let result = ctx.authenticator.authenticate("a@b.com", "Secr3t!").await;
        assert!(matches!(result, Err(AuthError::InfrastructureError(_))));
    }

    #[tokio::test]
    async fn unknown_identifier_takes_as_long_as_wrong_password() {
        // Cost high enough that hashing dominates everything else
        let ctx = TestContext::with_cost(8).await;
        ctx.add_user("a@b.com", "Secr3t!", true).await;

        // Warm up the blocking pool before measuring
        let _ = ctx.authenticator.authenticate("a@b.com", "wrong").await;

        // Load from parallel tests only ever adds time, so the fastest
        // sample of each path is the best estimate of its own cost
        let mut unknown = Duration::MAX;
        let mut wrong = Duration::MAX;
        for _ in 0..15 {
            let start = Instant::now();
            let _ = ctx.authenticator.authenticate("nobody@b.com", "Secr3t!").await;
            unknown = unknown.min(start.elapsed());

            let start = Instant::now();
            let _ = ctx.authenticator.authenticate("a@b.com", "wrong").await;
            wrong = wrong.min(start.elapsed());
        }

        let unknown = unknown.as_secs_f64();
        let wrong = wrong.as_secs_f64();
        let ratio = unknown / wrong;
        assert!(
            (0.5..=2.0).contains(&ratio),
            "unknown={:.4}s wrong={:.4}s ratio={:.2}",
            unknown,
            wrong,
            ratio
        );
    }
}
