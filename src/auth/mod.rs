//! Authentication for Curricula
//!
//! Provides:
//! - JWT token generation and validation
//! - Password hashing with Argon2
//!
//! The catalog and enrollment services never see credentials; protected
//! routes resolve the bearer token to claims and pass only the verified
//! user id onward.

pub mod jwt;
pub mod password;

pub use jwt::{extract_token_from_header, Claims, JwtValidator, TokenInput};
pub use password::{hash_password, verify_password};
