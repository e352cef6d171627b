//! Bearer access-token verification → AuthCtx in request extensions.
//!
//! Every failure (missing header, bad token, expired, ...) is logged with its
//! precise kind and answered with the same 401. Scope checks are left to the
//! handlers, which know what they need.

use axum::{
    Router,
    body::Body,
    extract::State,
    http::{Request, header},
    middleware::{self, Next},
    response::Response,
};
use tracing::warn;

use crate::api::v1::extractors::AuthCtx;
use crate::error::AppError;
use crate::services::auth;
use crate::state::AppState;

/// Require a valid bearer token on every route of `router`.
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    router.layer(middleware::from_fn_with_state(state, access_middleware))
}

async fn access_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let authorization = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    let claims = match auth::extract_bearer(authorization).and_then(|t| state.tokens.verify(t)) {
        Ok(claims) => claims,
        Err(err) => {
            warn!(error = %err, kind = ?err, "access token verification failed");
            return Err(AppError::unauthorized("Bearer"));
        }
    };

    let Some(subject) = claims
        .sub()
        .filter(|s| !s.trim().is_empty())
        .map(str::to_string)
    else {
        warn!("access token has no subject");
        return Err(AppError::unauthorized("Bearer"));
    };

    let auth_ctx = AuthCtx::new(subject, claims);

    // middleware → extractor
    req.extensions_mut().insert(auth_ctx);

    Ok(next.run(req).await)
}
