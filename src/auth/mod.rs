pub mod authenticator;
pub mod error;
pub mod password;
pub mod token;

pub use authenticator::Authenticator;
pub use error::AuthError;
pub use password::{HashingError, PasswordHasher, MAX_PASSWORD_BYTES};
pub use token::{Claims, SessionToken, TokenIssuer, TOKEN_TYPE};
