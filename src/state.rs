/*
 * Responsibility
 * - Shared context attached to the Router (AppState)
 * - Clone is cheap (Arc inside)
 */
use std::sync::Arc;

use crate::repos::AlertStore;
use crate::services::TokenService;

#[derive(Clone)]
pub struct AppState {
    pub alerts: Arc<dyn AlertStore>,
    pub tokens: Arc<TokenService>,
    pub persist_max_retries: u32,
}

impl AppState {
    pub fn new(alerts: Arc<dyn AlertStore>, tokens: Arc<TokenService>, persist_max_retries: u32) -> Self {
        Self {
            alerts,
            tokens,
            persist_max_retries,
        }
    }
}
