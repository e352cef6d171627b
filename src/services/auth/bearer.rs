//! Bearer token extraction and OAuth-style scope checks.

use std::collections::HashSet;

use crate::services::auth::claims::Claims;
use crate::services::auth::error::AuthError;
use crate::services::auth::header::split_scheme;

/// Extract the token from `Authorization: Bearer <token>`.
///
/// Returns the trimmed token text; decoding is left to [`super::jwt::decode`].
pub fn extract_bearer(header: &str) -> Result<&str, AuthError> {
    let (scheme, token) = split_scheme(header)?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(AuthError::AuthHeader("authorization scheme must be Bearer"));
    }

    let token = token.trim();
    if token.is_empty() {
        return Err(AuthError::AuthHeader("empty bearer token"));
    }

    Ok(token)
}

/// `true` when every required scope is granted by `claims`.
///
/// An empty requirement is always satisfied.
pub fn has_required_scopes(claims: &Claims, required: &HashSet<&str>) -> bool {
    if required.is_empty() {
        return true;
    }

    let available: HashSet<&str> = claims.granted_scopes().collect();
    required.is_subset(&available)
}
