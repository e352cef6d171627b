/*
 * Responsibility
 * - Application services: auth primitives, token issuance, alert processing
 */
pub mod alert_processor;
pub mod auth;
pub mod token_service;

pub use alert_processor::{AlertError, AlertEvent, StoredAlert, process_alert_event};
pub use token_service::{IssuedToken, ScopeRequestError, TokenService};
