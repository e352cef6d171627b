//! HS256 JWT codec.
//!
//! Tokens are `<b64url(header)>.<b64url(claims)>.<b64url(hmac)>`, every segment
//! without padding. Header and claims are serialized compactly with keys in
//! sorted order, so the same input always yields the same token.

use base64::Engine;
use base64::alphabet;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use serde_json::{Map, Value};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use crate::services::auth::claims::Claims;
use crate::services::auth::error::AuthError;

type HmacSha256 = Hmac<Sha256>;

pub const ALGORITHM: &str = "HS256";

// Canonical header bytes: sorted keys, no whitespace.
const HEADER_JSON: &str = r#"{"alg":"HS256","typ":"JWT"}"#;

// Decoding accepts segments with or without trailing `=`. Unused low bits in
// the final character are ignored; the signature check compares text, so
// they still cannot be altered.
const URL_SAFE_ANY_PAD: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// Create a signed HS256 token for `subject`.
///
/// - `iat` is `now` (defaults to the current UTC time) floored to seconds
/// - `exp` is `iat + ttl_seconds`; zero or negative TTLs are not rejected and
///   produce a token that is already expired
/// - non-empty `scopes` become a single space-joined `scope` claim, in order
///
/// The secret is not validated; an empty secret still signs.
pub fn encode(
    subject: &str,
    secret: &str,
    ttl_seconds: i64,
    scopes: &[&str],
    now: Option<DateTime<Utc>>,
) -> String {
    let iat = now.unwrap_or_else(Utc::now).timestamp();
    let exp = iat.saturating_add(ttl_seconds);

    // Inserted in sorted key order so the bytes are stable whether or not the
    // map implementation preserves insertion order.
    let mut claims = Map::new();
    claims.insert("exp".to_string(), Value::from(exp));
    claims.insert("iat".to_string(), Value::from(iat));
    if !scopes.is_empty() {
        claims.insert("scope".to_string(), Value::from(scopes.join(" ")));
    }
    claims.insert("sub".to_string(), Value::from(subject));

    let header_b64 = URL_SAFE_NO_PAD.encode(HEADER_JSON);
    let claims_b64 = URL_SAFE_NO_PAD.encode(Value::Object(claims).to_string());
    let signature = sign(secret.as_bytes(), &signing_input(&header_b64, &claims_b64));

    format!(
        "{header_b64}.{claims_b64}.{}",
        URL_SAFE_NO_PAD.encode(signature)
    )
}

/// Verify an HS256 token and return its claims.
///
/// Checks run in this order: structure, algorithm allow-list, signature,
/// presence of `exp`, expiry. A token is expired from the instant
/// `now >= exp`. `now` defaults to the current UTC time.
pub fn decode(token: &str, secret: &str, now: Option<DateTime<Utc>>) -> Result<Claims, AuthError> {
    let mut segments = token.split('.');
    let (Some(header_b64), Some(claims_b64), Some(signature_b64), None) = (
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
    ) else {
        return Err(AuthError::MalformedToken);
    };

    let header = decode_object(header_b64)?;
    let claims = decode_object(claims_b64)?;
    URL_SAFE_ANY_PAD
        .decode(signature_b64)
        .map_err(|_| AuthError::MalformedToken)?;

    // Never let the token pick the verification method.
    if header.get("alg").and_then(Value::as_str) != Some(ALGORITHM) {
        return Err(AuthError::UnsupportedAlgorithm);
    }

    // Compared as unpadded text: two encodings that differ only in the unused
    // low bits of the last character decode to the same bytes.
    let expected = URL_SAFE_NO_PAD.encode(sign(
        secret.as_bytes(),
        &signing_input(header_b64, claims_b64),
    ));
    let presented = signature_b64.trim_end_matches('=');
    if !bool::from(presented.as_bytes().ct_eq(expected.as_bytes())) {
        return Err(AuthError::InvalidSignature);
    }

    let exp = claims.get("exp").ok_or(AuthError::MissingExpiration)?;
    let exp = epoch_seconds(exp).ok_or(AuthError::MalformedToken)?;

    let current = now.unwrap_or_else(Utc::now).timestamp();
    if current >= exp {
        return Err(AuthError::Expired);
    }

    Ok(Claims::from(claims))
}

fn signing_input(header_b64: &str, claims_b64: &str) -> String {
    format!("{header_b64}.{claims_b64}")
}

fn sign(secret: &[u8], signing_input: &str) -> Vec<u8> {
    let mut mac = HmacSha256::new_from_slice(secret).expect("HMAC accepts keys of any length");
    mac.update(signing_input.as_bytes());
    mac.finalize().into_bytes().to_vec()
}

fn decode_object(segment: &str) -> Result<Map<String, Value>, AuthError> {
    let bytes = URL_SAFE_ANY_PAD
        .decode(segment)
        .map_err(|_| AuthError::MalformedToken)?;
    serde_json::from_slice(&bytes).map_err(|_| AuthError::MalformedToken)
}

// Integer seconds; fractional values are truncated toward zero. A string
// holding a plain integer is accepted too, anything else is not a timestamp.
fn epoch_seconds(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
