//! `farmgate-auth` — authentication boundary.
//!
//! This crate is intentionally decoupled from HTTP and storage: it models JWT
//! claims, signs/verifies HS256 tokens and hashes passwords. Mapping users to
//! rows and tokens to request contexts happens in `infra`/`api`.

pub mod claims;
pub mod jwt;
pub mod password;
pub mod roles;

pub use claims::{JwtClaims, TokenValidationError, validate_claims};
pub use jwt::{Hs256JwtCodec, JwtError, JwtValidator};
pub use password::{hash_password, verify_password, PasswordError};
pub use roles::Role;
