/*
 * Responsibility
 * - Alert model with field validation
 * - Severity classification by alert type
 */
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AlertType {
    Leak,
    Blockage,
    Pressure,
    Temperature,
    Acoustic,
}

impl AlertType {
    pub const ALL: [AlertType; 5] = [
        AlertType::Leak,
        AlertType::Blockage,
        AlertType::Pressure,
        AlertType::Temperature,
        AlertType::Acoustic,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AlertType::Leak => "LEAK",
            AlertType::Blockage => "BLOCKAGE",
            AlertType::Pressure => "PRESSURE",
            AlertType::Temperature => "TEMPERATURE",
            AlertType::Acoustic => "ACOUSTIC",
        }
    }
}

impl fmt::Display for AlertType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AlertType {
    type Err = ValidationError;

    // Exact, case-sensitive match.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or(ValidationError::AlertType)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Critical,
    Moderate,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "CRITICAL",
            Severity::Moderate => "MODERATE",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Leaks and blockages are critical; every other reading is moderate.
pub fn classify_alert(alert_type: AlertType) -> Severity {
    match alert_type {
        AlertType::Leak | AlertType::Blockage => Severity::Critical,
        AlertType::Pressure | AlertType::Temperature | AlertType::Acoustic => Severity::Moderate,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("timestamp is required")]
    Timestamp,
    #[error("site_id is required")]
    SiteId,
    #[error("alert_type must be one of: LEAK, BLOCKAGE, PRESSURE, TEMPERATURE, ACOUSTIC")]
    AlertType,
    #[error("latitude must be between -90 and 90")]
    Latitude,
    #[error("longitude must be between -180 and 180")]
    Longitude,
}

impl ValidationError {
    /// Name of the offending field.
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::Timestamp => "timestamp",
            ValidationError::SiteId => "site_id",
            ValidationError::AlertType => "alert_type",
            ValidationError::Latitude => "latitude",
            ValidationError::Longitude => "longitude",
        }
    }
}

/// A validated alert reading.
///
/// Fields are private so every instance went through [`Alert::new`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Alert {
    timestamp: String,
    site_id: String,
    alert_type: AlertType,
    severity: Severity,
    latitude: f64,
    longitude: f64,
}

impl Alert {
    pub fn new(
        timestamp: impl Into<String>,
        site_id: impl Into<String>,
        alert_type: AlertType,
        severity: Severity,
        latitude: f64,
        longitude: f64,
    ) -> Result<Self, ValidationError> {
        let timestamp = timestamp.into();
        let site_id = site_id.into();

        if timestamp.trim().is_empty() {
            return Err(ValidationError::Timestamp);
        }
        if site_id.trim().is_empty() {
            return Err(ValidationError::SiteId);
        }
        // NaN fails both range checks
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(ValidationError::Latitude);
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(ValidationError::Longitude);
        }

        Ok(Self {
            timestamp,
            site_id,
            alert_type,
            severity,
            latitude,
            longitude,
        })
    }

    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    pub fn site_id(&self) -> &str {
        &self.site_id
    }

    pub fn alert_type(&self) -> AlertType {
        self.alert_type
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leak(latitude: f64, longitude: f64) -> Result<Alert, ValidationError> {
        Alert::new(
            "2024-01-26T10:00:00Z",
            "SITE_001",
            AlertType::Leak,
            Severity::Critical,
            latitude,
            longitude,
        )
    }

    #[test]
    fn classifier_rules() {
        assert_eq!(classify_alert(AlertType::Leak), Severity::Critical);
        assert_eq!(classify_alert(AlertType::Blockage), Severity::Critical);
        assert_eq!(classify_alert(AlertType::Pressure), Severity::Moderate);
        assert_eq!(classify_alert(AlertType::Temperature), Severity::Moderate);
        assert_eq!(classify_alert(AlertType::Acoustic), Severity::Moderate);
    }

    #[test]
    fn valid_alert_accepted() {
        let alert = leak(29.7604, -95.3698).unwrap();
        assert_eq!(alert.latitude(), 29.7604);
        assert_eq!(alert.longitude(), -95.3698);
        assert_eq!(alert.alert_type(), AlertType::Leak);
    }

    #[test]
    fn coordinate_bounds_are_inclusive() {
        assert!(leak(90.0, 180.0).is_ok());
        assert!(leak(-90.0, -180.0).is_ok());
    }

    #[test]
    fn out_of_range_coordinates_rejected() {
        assert_eq!(leak(999.9, -95.3698), Err(ValidationError::Latitude));
        assert_eq!(leak(-90.1, 0.0), Err(ValidationError::Latitude));
        assert_eq!(leak(f64::NAN, 0.0), Err(ValidationError::Latitude));
        assert_eq!(leak(29.7604, 999.9), Err(ValidationError::Longitude));
        assert_eq!(leak(0.0, f64::INFINITY), Err(ValidationError::Longitude));
    }

    #[test]
    fn error_messages_name_the_field() {
        let err = leak(999.9, 0.0).unwrap_err();
        assert_eq!(err.field(), "latitude");
        assert!(err.to_string().contains("latitude"));
    }

    #[test]
    fn blank_identifiers_rejected() {
        let err = Alert::new(
            " ",
            "SITE_001",
            AlertType::Acoustic,
            Severity::Moderate,
            0.0,
            0.0,
        );
        assert_eq!(err, Err(ValidationError::Timestamp));

        let err = Alert::new(
            "2024-01-26T10:00:00Z",
            "",
            AlertType::Acoustic,
            Severity::Moderate,
            0.0,
            0.0,
        );
        assert_eq!(err, Err(ValidationError::SiteId));
    }

    #[test]
    fn alert_type_parsing_is_exact() {
        assert_eq!("LEAK".parse::<AlertType>(), Ok(AlertType::Leak));
        assert_eq!("ACOUSTIC".parse::<AlertType>(), Ok(AlertType::Acoustic));
        assert_eq!(
            "leak".parse::<AlertType>(),
            Err(ValidationError::AlertType)
        );

        let err = "NOT_A_REAL_TYPE".parse::<AlertType>().unwrap_err();
        assert!(err.to_string().contains("LEAK, BLOCKAGE"));
    }

    #[test]
    fn serializes_with_wire_names() {
        let alert = leak(1.0, 2.0).unwrap();
        let json = serde_json::to_value(&alert).unwrap();
        assert_eq!(json["alert_type"], "LEAK");
        assert_eq!(json["severity"], "CRITICAL");
    }
}
