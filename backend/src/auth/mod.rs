//! Authentication module
//!
//! Provides bcrypt password hashing, JWT bearer tokens, and the extractor
//! that gates protected routes.

mod jwt;
mod middleware;
mod password;

pub use jwt::{Claims, JwtService};
pub use middleware::{bearer_token, AuthUser};
pub use password::{clamp_password, PasswordService, MAX_PASSWORD_BYTES};
