/*
 * Responsibility
 * - Pure business rules for sensor alerts (no I/O)
 */
pub mod alert;

pub use alert::{Alert, AlertType, Severity, ValidationError, classify_alert};
