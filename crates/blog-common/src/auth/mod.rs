//! Authentication utilities

mod password;
mod tokens;

pub use password::{hash_password, verify_password};
pub use tokens::{Claims, TokenKind, TokenService, RESET_TOKEN_TTL_SECS};
