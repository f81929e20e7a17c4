use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use super::error::AuthError;
use crate::config::{ConfigError, SecurityConfig, SUPPORTED_ALGORITHMS};

pub const TOKEN_TYPE: &str = "bearer";

/// Claim set carried by every session token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (credential identifier)
    pub sub: String,
    /// Issued at, unix seconds. Always set on issue, optional on verify.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
    /// Expiry, unix seconds. `iat + lifetime` for tokens issued here.
    pub exp: i64,
}

/// A signed, time-bound assertion of identity. Never persisted server-side.
#[derive(Debug, Clone)]
pub struct SessionToken {
    pub access_token: String,
    pub claims: Claims,
    issued_at: i64,
}

impl SessionToken {
    pub fn subject(&self) -> &str {
        &self.claims.sub
    }

    /// Seconds of validity remaining at issuance
    pub fn expires_in(&self) -> i64 {
        self.claims.exp - self.issued_at
    }
}

/// Signs and verifies session tokens with a process-wide symmetric key.
///
/// There is no revocation list: a token stays valid until `exp` even if the
/// account behind it is deactivated afterwards.
#[derive(Clone)]
pub struct TokenIssuer {
    algorithm: Algorithm,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    lifetime: Duration,
}

impl std::fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("algorithm", &self.algorithm)
            .field("lifetime", &self.lifetime)
            .finish_non_exhaustive()
    }
}

impl TokenIssuer {
    pub fn new(secret: &[u8], algorithm: Algorithm, lifetime: Duration) -> Result<Self, ConfigError> {
        if secret.is_empty() {
            return Err(ConfigError::MissingSecret);
        }
        if !matches!(algorithm, Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512) {
            return Err(ConfigError::UnsupportedAlgorithm(format!("{:?}", algorithm)));
        }
        if lifetime <= Duration::zero() {
            return Err(ConfigError::InvalidTokenLifetime(lifetime.num_minutes()));
        }

        Ok(Self {
            algorithm,
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            lifetime,
        })
    }

    pub fn from_config(security: &SecurityConfig) -> Result<Self, ConfigError> {
        if !SUPPORTED_ALGORITHMS.contains(&security.algorithm.as_str()) {
            return Err(ConfigError::UnsupportedAlgorithm(security.algorithm.clone()));
        }
        let algorithm = Algorithm::from_str(&security.algorithm)
            .map_err(|_| ConfigError::UnsupportedAlgorithm(security.algorithm.clone()))?;
        let lifetime = Duration::try_minutes(security.access_token_expire_minutes)
            .ok_or(ConfigError::InvalidTokenLifetime(security.access_token_expire_minutes))?;

        Self::new(security.secret_key.as_bytes(), algorithm, lifetime)
    }

    pub fn lifetime(&self) -> Duration {
        self.lifetime
    }

    pub fn issue(&self, subject: &str) -> Result<SessionToken, AuthError> {
        self.issue_at(subject, Utc::now())
    }

    pub fn issue_at(&self, subject: &str, now: DateTime<Utc>) -> Result<SessionToken, AuthError> {
        let iat = now.timestamp();
        let claims = Claims {
            sub: subject.to_string(),
            iat: Some(iat),
            exp: iat + self.lifetime.num_seconds(),
        };

        let access_token = encode(&Header::new(self.algorithm), &claims, &self.encoding_key)
            .map_err(|e| AuthError::InfrastructureError(format!("token signing failed: {}", e)))?;

        Ok(SessionToken {
            access_token,
            claims,
            issued_at: iat,
        })
    }

    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        self.verify_at(token, Utc::now())
    }

    /// Signature first, then expiry. A token is rejected once `now >= exp`.
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, AuthError> {
        let mut validation = Validation::new(self.algorithm);
        // Expiry is checked below against `now` with no leeway
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.set_required_spec_claims(&["exp", "sub"]);

        let data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| match e.kind() {
            ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => AuthError::InvalidSignature,
            ErrorKind::ExpiredSignature => AuthError::TokenExpired,
            _ => AuthError::MalformedToken(e.to_string()),
        })?;

        if now.timestamp() >= data.claims.exp {
            return Err(AuthError::TokenExpired);
        }

        Ok(data.claims)
    }
}
