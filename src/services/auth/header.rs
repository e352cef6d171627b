//! `<scheme> <payload>` grammar shared by the Basic and Bearer parsers.

use crate::services::auth::error::AuthError;

/// Split a raw `Authorization` value into `(scheme, payload)`.
///
/// Surrounding whitespace is ignored and the split happens on the first run
/// of whitespace. The scheme is returned as-is; callers compare it
/// case-insensitively.
pub(super) fn split_scheme(header: &str) -> Result<(&str, &str), AuthError> {
    let header = header.trim();
    if header.is_empty() {
        return Err(AuthError::AuthHeader("missing authorization header"));
    }

    let (scheme, payload) = header
        .split_once(char::is_whitespace)
        .ok_or(AuthError::AuthHeader("malformed authorization header"))?;

    Ok((scheme, payload.trim_start()))
}
