/*
 * Responsibility
 * - The "authenticated request" context handlers see
 * - Token verification lives in middleware/services; this is only the contract
 */
use std::collections::HashSet;

use tracing::warn;

use crate::error::AppError;
use crate::services::auth::{Claims, has_required_scopes};

/// Context attached to a request whose bearer token verified.
///
/// - `subject` is the token `sub`
/// - `claims` is the full claim set, unknown claims included
#[derive(Debug, Clone)]
pub struct AuthCtx {
    pub subject: String,
    pub claims: Claims,
}

impl AuthCtx {
    pub fn new(subject: String, claims: Claims) -> Self {
        Self { subject, claims }
    }

    /// 403 unless every scope in `required` is granted.
    pub fn require_scopes(&self, required: &[&str]) -> Result<(), AppError> {
        let required: HashSet<&str> = required.iter().copied().collect();
        if has_required_scopes(&self.claims, &required) {
            return Ok(());
        }

        warn!(subject = %self.subject, required = ?required, "insufficient scope");
        Err(AppError::Forbidden)
    }
}
