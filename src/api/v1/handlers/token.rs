use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::{HeaderMap, header},
};
use tracing::{info, warn};

use crate::api::v1::dto::token::{TokenRequest, TokenResponse};
use crate::error::AppError;
use crate::services::ScopeRequestError;
use crate::state::AppState;

/// `POST /token`: Basic-authenticated operator → HS256 access token.
///
/// The JSON body is optional; an empty body requests every granted scope.
pub async fn issue_token(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<TokenResponse>, AppError> {
    let authorization = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    if !state.tokens.authenticate(authorization) {
        warn!("basic authentication failed");
        return Err(AppError::unauthorized("Basic"));
    }

    let req: TokenRequest = if body.iter().all(u8::is_ascii_whitespace) {
        TokenRequest::default()
    } else {
        serde_json::from_slice(&body)
            .map_err(|e| AppError::bad_request("invalid_request", e.to_string()))?
    };

    let scopes = state
        .tokens
        .resolve_scopes(req.scope.as_deref())
        .map_err(|e| match e {
            ScopeRequestError::NotGranted(scope) => {
                AppError::bad_request("invalid_scope", format!("scope not granted: {scope}"))
            }
        })?;

    let issued = state.tokens.issue(state.tokens.operator(), &scopes, None);

    info!(subject = %state.tokens.operator(), scope = %issued.scope, "access token issued");

    Ok(Json(TokenResponse {
        access_token: issued.access_token,
        token_type: issued.token_type,
        expires_in: issued.expires_in,
        scope: issued.scope,
    }))
}
