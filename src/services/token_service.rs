use std::collections::HashSet;
use std::fmt;

use chrono::{DateTime, Utc};

use crate::config::Config;
use crate::services::auth::{self, AuthError, Claims, jwt};

/// Issues and verifies HS256 access tokens for the operator account.
///
/// - The operator authenticates with Basic credentials at the token endpoint.
/// - Granted scopes come from config; a request may only narrow them.
/// - Key material is intentionally not printable via Debug.
#[derive(Clone)]
pub struct TokenService {
    secret: String,
    ttl_seconds: i64,
    username: String,
    password: String,
    granted_scopes: Vec<String>,
}

impl fmt::Debug for TokenService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenService")
            .field("ttl_seconds", &self.ttl_seconds)
            .field("username", &self.username)
            .field("granted_scopes", &self.granted_scopes)
            .finish_non_exhaustive()
    }
}

/// Service-level return type to keep handlers thin.
#[derive(Clone, Debug)]
pub struct IssuedToken {
    pub access_token: String,
    pub token_type: &'static str,
    pub expires_in: i64,
    pub scope: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScopeRequestError {
    /// Requested a scope the operator is not granted.
    NotGranted(String),
}

impl TokenService {
    pub fn new(
        secret: String,
        ttl_seconds: i64,
        username: String,
        password: String,
        granted_scopes: Vec<String>,
    ) -> Self {
        Self {
            secret,
            ttl_seconds,
            username,
            password,
            granted_scopes,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.api_token.clone(),
            config.access_token_ttl_seconds,
            config.basic_auth_username.clone(),
            config.basic_auth_password.clone(),
            config.token_scopes.clone(),
        )
    }

    /// Subject of every token this service issues.
    pub fn operator(&self) -> &str {
        &self.username
    }

    /// Check a Basic `Authorization` value against the operator credentials.
    pub fn authenticate(&self, authorization: &str) -> bool {
        auth::verify_basic_credentials(authorization, &self.username, &self.password)
    }

    /// Resolve the scopes for a token request.
    ///
    /// `None` (or a blank string) grants everything configured. Otherwise each
    /// requested scope must be granted; the result keeps request order and
    /// drops duplicates.
    pub fn resolve_scopes(&self, requested: Option<&str>) -> Result<Vec<String>, ScopeRequestError> {
        let requested: Vec<&str> = requested
            .map(|s| s.split_whitespace().collect())
            .unwrap_or_default();

        if requested.is_empty() {
            return Ok(self.granted_scopes.clone());
        }

        let mut seen = HashSet::new();
        let mut scopes = Vec::with_capacity(requested.len());
        for scope in requested {
            if !self.granted_scopes.iter().any(|g| g == scope) {
                return Err(ScopeRequestError::NotGranted(scope.to_string()));
            }
            if seen.insert(scope) {
                scopes.push(scope.to_string());
            }
        }

        Ok(scopes)
    }

    /// Issue an access token for `subject` with exactly `scopes`.
    pub fn issue(&self, subject: &str, scopes: &[String], now: Option<DateTime<Utc>>) -> IssuedToken {
        let scope_refs: Vec<&str> = scopes.iter().map(String::as_str).collect();
        let access_token = jwt::encode(subject, &self.secret, self.ttl_seconds, &scope_refs, now);

        IssuedToken {
            access_token,
            token_type: "Bearer",
            expires_in: self.ttl_seconds,
            scope: scope_refs.join(" "),
        }
    }

    /// Verify an access token against the current time.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        jwt::decode(token, &self.secret, None)
    }
}
