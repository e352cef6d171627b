/*!
 * Authentication context extractor
 *
 * Responsibility:
 * - Hand the verified token context (AuthCtx) to handlers
 * - axum-specific code stays in core, the type itself in types
 */

mod core;
mod types;

pub use self::core::AuthCtxExtractor;
pub use self::types::AuthCtx;
