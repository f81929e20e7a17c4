// handlers/public/mod.rs - Public handlers (no authentication required)
//
// Token acquisition and liveness. Every input here is untrusted.

pub mod health;
pub mod login;
pub mod root;

pub use health::health;
pub use login::login_access_token;
pub use root::root;
