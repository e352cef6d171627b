//! HTTP Basic credentials: `Authorization: Basic <base64(username:password)>`.

use std::fmt;

use base64::Engine;
use base64::alphabet;
use base64::engine::{GeneralPurpose, GeneralPurposeConfig};
use subtle::ConstantTimeEq;

use crate::services::auth::error::AuthError;
use crate::services::auth::header::split_scheme;

// Standard alphabet with canonical padding required. Unused low bits in the
// final character are ignored, as most Basic clients and servers do.
const STANDARD_LENIENT_BITS: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_allow_trailing_bits(true),
);

/// Username/password pair decoded from a Basic header.
///
/// Transient: produced by [`parse_basic_auth_header`] and consumed by a comparison.
#[derive(Clone, PartialEq, Eq)]
pub struct BasicCredentials {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for BasicCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Do not print the password
        f.debug_struct("BasicCredentials")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

/// Parse a Basic `Authorization` header value.
///
/// The payload must be strict standard base64 (alphabet and padding checked)
/// of UTF-8 text containing a `:`. The split happens on the first `:`, so the
/// password may itself contain colons. An empty username is rejected, an
/// empty password is not.
pub fn parse_basic_auth_header(header: &str) -> Result<BasicCredentials, AuthError> {
    let (scheme, encoded) = split_scheme(header)?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return Err(AuthError::AuthHeader("authorization scheme must be Basic"));
    }

    let decoded = STANDARD_LENIENT_BITS
        .decode(encoded)
        .map_err(|_| AuthError::MalformedCredentials)?;
    let decoded = String::from_utf8(decoded).map_err(|_| AuthError::MalformedCredentials)?;

    let (username, password) = decoded
        .split_once(':')
        .ok_or(AuthError::MalformedCredentials)?;
    if username.is_empty() {
        return Err(AuthError::MalformedCredentials);
    }

    Ok(BasicCredentials {
        username: username.to_string(),
        password: password.to_string(),
    })
}

/// Check a Basic header against the expected username and password.
///
/// Any parse failure is a plain `false`. Both fields are compared in constant
/// time and both comparisons always run, so the result does not reveal which
/// field was wrong.
pub fn verify_basic_credentials(
    header: &str,
    expected_username: &str,
    expected_password: &str,
) -> bool {
    let Ok(credentials) = parse_basic_auth_header(header) else {
        return false;
    };

    let username_ok = credentials
        .username
        .as_bytes()
        .ct_eq(expected_username.as_bytes());
    let password_ok = credentials
        .password
        .as_bytes()
        .ct_eq(expected_password.as_bytes());

    (username_ok & password_ok).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::engine::general_purpose::STANDARD;

    fn basic_header(username: &str, password: &str) -> String {
        format!("Basic {}", STANDARD.encode(format!("{username}:{password}")))
    }

    #[test]
    fn parse_returns_username_and_password() {
        let creds = parse_basic_auth_header(&basic_header("alice", "wonderland")).unwrap();

        assert_eq!(creds.username, "alice");
        assert_eq!(creds.password, "wonderland");
    }

    #[test]
    fn parse_splits_on_first_colon_and_allows_empty_password() {
        let creds = parse_basic_auth_header(&basic_header("ops", "a:b:c")).unwrap();
        assert_eq!(creds.username, "ops");
        assert_eq!(creds.password, "a:b:c");

        let creds = parse_basic_auth_header(&basic_header("ops", "")).unwrap();
        assert_eq!(creds.password, "");
    }

    #[test]
    fn scheme_is_case_insensitive_and_whitespace_tolerant() {
        let encoded = STANDARD.encode("alice:wonderland");
        let creds = parse_basic_auth_header(&format!("  bAsIc \t {encoded}  ")).unwrap();
        assert_eq!(creds.username, "alice");
    }

    #[test]
    fn header_shape_errors() {
        assert!(matches!(
            parse_basic_auth_header(""),
            Err(AuthError::AuthHeader(_))
        ));
        assert!(matches!(
            parse_basic_auth_header("Basic"),
            Err(AuthError::AuthHeader(_))
        ));
        assert!(matches!(
            parse_basic_auth_header("Bearer YWxpY2U6eA=="),
            Err(AuthError::AuthHeader(_))
        ));
    }

    #[test]
    fn payload_errors_are_malformed_credentials() {
        let cases = [
            "Basic not-base64!!".to_string(),
            // "alice:wonderland" without its padding
            "Basic YWxpY2U6d29uZGVybGFuZA".to_string(),
            // not UTF-8
            format!("Basic {}", STANDARD.encode([0xff, 0xfe, b':', b'x'])),
            // no colon
            format!("Basic {}", STANDARD.encode("alice")),
            // empty username
            format!("Basic {}", STANDARD.encode(":secret")),
        ];

        for header in cases {
            assert_eq!(
                parse_basic_auth_header(&header),
                Err(AuthError::MalformedCredentials),
                "{header}"
            );
        }
    }

    #[test]
    fn non_canonical_trailing_bits_are_accepted() {
        // "alice:x" is "YWxpY2U6eA=="; the final "B" only sets unused bits
        let creds = parse_basic_auth_header("Basic YWxpY2U6eB==").unwrap();
        assert_eq!(creds.username, "alice");
        assert_eq!(creds.password, "x");
    }

    #[test]
    fn verify_accepts_match_and_rejects_mismatch() {
        let header = basic_header("ops-user", "secret-pass");
        assert!(verify_basic_credentials(&header, "ops-user", "secret-pass"));

        let header = basic_header("ops-user", "secret-pasS");
        assert!(!verify_basic_credentials(&header, "ops-user", "secret-pass"));

        let header = basic_header("ops-usr", "secret-pass");
        assert!(!verify_basic_credentials(&header, "ops-user", "secret-pass"));
    }

    #[test]
    fn verify_denies_malformed_input() {
        assert!(!verify_basic_credentials("", "ops-user", "secret-pass"));
        assert!(!verify_basic_credentials("Basic !!", "ops-user", "secret-pass"));
    }

    #[test]
    fn debug_hides_password() {
        let creds = parse_basic_auth_header(&basic_header("alice", "wonderland")).unwrap();
        let printed = format!("{creds:?}");
        assert!(printed.contains("alice"));
        assert!(!printed.contains("wonderland"));
    }
}
