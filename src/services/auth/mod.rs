/*
 * Responsibility
 * - Stateless authentication primitives: Basic credentials, HS256 tokens, bearer + scope checks
 * - Pure functions over header strings, secrets and an optional clock; no I/O, safe to call concurrently
 */
pub mod basic;
pub mod bearer;
pub mod claims;
pub mod error;
mod header;
pub mod jwt;

pub use basic::{BasicCredentials, parse_basic_auth_header, verify_basic_credentials};
pub use bearer::{extract_bearer, has_required_scopes};
pub use claims::Claims;
pub use error::AuthError;
