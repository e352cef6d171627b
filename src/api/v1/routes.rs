/*
 * Responsibility
 * - v1 URL layout
 * - /health and /token are public; /alerts sits behind the bearer middleware
 */
use axum::{
    Router,
    routing::{get, post},
};

use crate::api::v1::handlers::{
    alerts::{create_alert, list_alerts},
    health::health,
    token::issue_token,
};
use crate::middleware;
use crate::state::AppState;

pub fn routes(state: AppState) -> Router<AppState> {
    let protected = Router::new().route("/alerts", get(list_alerts).post(create_alert));
    let protected = middleware::auth::access::apply(protected, state);

    Router::new()
        .route("/health", get(health))
        .route("/token", post(issue_token))
        .merge(protected)
}
