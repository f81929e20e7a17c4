// handlers/protected/mod.rs - Handlers behind jwt_auth_middleware
//
// Each handler receives the verified caller as Extension<AuthUser>.

pub mod whoami;

pub use whoami::whoami;
