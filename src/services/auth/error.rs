/*
 * Responsibility
 * - Failure kinds of the auth subsystem (Basic / Bearer header, HS256 token)
 * - Kept independent from AppError: every kind is a rejection, the HTTP layer decides the status
 */
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthError {
    /// Header missing, not `<scheme> <payload>`, or wrong scheme.
    #[error("invalid authorization header: {0}")]
    AuthHeader(&'static str),

    #[error("malformed basic credentials")]
    MalformedCredentials,

    #[error("malformed token")]
    MalformedToken,

    #[error("unsupported token algorithm")]
    UnsupportedAlgorithm,

    #[error("invalid token signature")]
    InvalidSignature,

    #[error("token missing exp claim")]
    MissingExpiration,

    #[error("token expired")]
    Expired,
}
