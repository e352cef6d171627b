/*
 * Responsibility
 * - Alerts request/response DTOs
 * - Shape only; field validation happens in the domain
 */
use serde::{Deserialize, Serialize};

use crate::repos::AlertRow;
use crate::services::{AlertEvent, StoredAlert};

#[derive(Debug, Deserialize)]
pub struct CreateAlertRequest {
    pub timestamp: String,
    pub site_id: String,
    pub alert_type: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl From<CreateAlertRequest> for AlertEvent {
    fn from(req: CreateAlertRequest) -> Self {
        AlertEvent {
            timestamp: req.timestamp,
            site_id: req.site_id,
            alert_type: req.alert_type,
            latitude: req.latitude,
            longitude: req.longitude,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ListAlertsQuery {
    pub limit: Option<i64>,
}

impl ListAlertsQuery {
    pub const DEFAULT_LIMIT: i64 = 50;
    pub const MAX_LIMIT: i64 = 500;

    pub fn limit(&self) -> i64 {
        self.limit
            .unwrap_or(Self::DEFAULT_LIMIT)
            .clamp(1, Self::MAX_LIMIT)
    }
}

#[derive(Debug, Serialize)]
pub struct AlertResponse {
    pub id: i64,
    pub timestamp: String,
    pub site_id: String,
    pub alert_type: String,
    pub severity: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl From<StoredAlert> for AlertResponse {
    fn from(stored: StoredAlert) -> Self {
        let alert = stored.alert;
        Self {
            id: stored.id,
            timestamp: alert.timestamp().to_string(),
            site_id: alert.site_id().to_string(),
            alert_type: alert.alert_type().to_string(),
            severity: alert.severity().to_string(),
            latitude: alert.latitude(),
            longitude: alert.longitude(),
        }
    }
}

impl From<AlertRow> for AlertResponse {
    fn from(row: AlertRow) -> Self {
        Self {
            id: row.id,
            timestamp: row.timestamp,
            site_id: row.site_id,
            alert_type: row.alert_type,
            severity: row.severity,
            latitude: row.latitude,
            longitude: row.longitude,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_limit_defaults_and_clamps() {
        assert_eq!(ListAlertsQuery { limit: None }.limit(), 50);
        assert_eq!(ListAlertsQuery { limit: Some(0) }.limit(), 1);
        assert_eq!(ListAlertsQuery { limit: Some(-5) }.limit(), 1);
        assert_eq!(ListAlertsQuery { limit: Some(10_000) }.limit(), 500);
        assert_eq!(ListAlertsQuery { limit: Some(20) }.limit(), 20);
    }
}
