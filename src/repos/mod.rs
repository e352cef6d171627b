/*
 * Responsibility
 * - SQLite persistence (alerts table)
 * - AlertStore: the seam services use, so they never see SqlitePool directly
 */
pub mod alert_repo;
pub mod error;

pub use alert_repo::{AlertRow, AlertStore, SqliteAlertStore};
pub use error::RepoError;
