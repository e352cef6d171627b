/*
 * Responsibility
 * - validate → classify → persist for one incoming alert
 * - Persistence retries with structured logs; validation errors are never retried
 */
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::domain::{Alert, AlertType, ValidationError, classify_alert};
use crate::repos::{AlertStore, RepoError};

/// Raw alert reading as received from a sensor gateway.
#[derive(Debug, Clone, Deserialize)]
pub struct AlertEvent {
    pub timestamp: String,
    pub site_id: String,
    pub alert_type: String,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct StoredAlert {
    pub id: i64,
    #[serde(flatten)]
    pub alert: Alert,
}

#[derive(Debug, Error)]
pub enum AlertError {
    #[error("invalid alert: {0}")]
    Validation(#[from] ValidationError),

    #[error("failed to persist alert after {attempts} attempts")]
    Persist {
        attempts: u32,
        #[source]
        source: RepoError,
    },
}

/// Process one alert event.
///
/// Persistence is attempted up to `max_retries + 1` times.
pub async fn process_alert_event(
    store: &dyn AlertStore,
    event: AlertEvent,
    max_retries: u32,
) -> Result<StoredAlert, AlertError> {
    debug!(
        site_id = %event.site_id,
        alert_type = %event.alert_type,
        "processing_alert"
    );

    let alert = match validate(event) {
        Ok(alert) => alert,
        Err(e) => {
            warn!(field = e.field(), error = %e, "validation_failed");
            return Err(e.into());
        }
    };

    let mut attempt: u32 = 0;
    loop {
        attempt += 1;
        match store.insert(&alert).await {
            Ok(id) => {
                info!(
                    id,
                    site_id = %alert.site_id(),
                    severity = %alert.severity(),
                    attempt,
                    "alert_recorded"
                );
                return Ok(StoredAlert { id, alert });
            }
            Err(e) if attempt <= max_retries => {
                warn!(attempt, max_retries, error = %e, "retrying_persist");
            }
            Err(e) => {
                error!(
                    attempts = attempt,
                    site_id = %alert.site_id(),
                    error = ?e,
                    "alert_processing_failed"
                );
                return Err(AlertError::Persist {
                    attempts: attempt,
                    source: e,
                });
            }
        }
    }
}

fn validate(event: AlertEvent) -> Result<Alert, ValidationError> {
    let alert_type: AlertType = event.alert_type.parse()?;

    Alert::new(
        event.timestamp,
        event.site_id,
        alert_type,
        classify_alert(alert_type),
        event.latitude,
        event.longitude,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use tracing_subscriber::fmt::MakeWriter;

    use crate::domain::Severity;
    use crate::repos::{AlertRow, SqliteAlertStore};
    use crate::repos::alert_repo::tests::memory_pool;

    /// Fails the first `failures` inserts, then succeeds.
    struct FlakyStore {
        failures: u32,
        calls: AtomicU32,
    }

    impl FlakyStore {
        fn new(failures: u32) -> Self {
            Self {
                failures,
                calls: AtomicU32::new(0),
            }
        }

        fn calls(&self) -> u32 {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl AlertStore for FlakyStore {
        async fn insert(&self, _alert: &Alert) -> Result<i64, RepoError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if n <= self.failures {
                return Err(RepoError::Db(sqlx::Error::PoolTimedOut));
            }
            Ok(i64::from(n))
        }

        async fn list(&self, _limit: i64) -> Result<Vec<AlertRow>, RepoError> {
            Ok(Vec::new())
        }
    }

    #[derive(Clone, Default)]
    struct LogBuffer(Arc<Mutex<Vec<u8>>>);

    impl LogBuffer {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl io::Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for LogBuffer {
        type Writer = LogBuffer;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    fn capture_logs() -> (LogBuffer, tracing::subscriber::DefaultGuard) {
        let buffer = LogBuffer::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(buffer.clone())
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .finish();
        let guard = tracing::subscriber::set_default(subscriber);
        (buffer, guard)
    }

    fn event(alert_type: &str) -> AlertEvent {
        AlertEvent {
            timestamp: "2024-01-26T10:00:00Z".to_string(),
            site_id: "SITE_001".to_string(),
            alert_type: alert_type.to_string(),
            latitude: 29.7604,
            longitude: -95.3698,
        }
    }

    #[tokio::test]
    async fn happy_path_classifies_persists_and_logs() {
        let (logs, _guard) = capture_logs();
        let pool = memory_pool().await;
        let store = SqliteAlertStore::new(pool.clone());

        let stored = process_alert_event(&store, event("LEAK"), 2).await.unwrap();

        assert_eq!(stored.alert.severity(), Severity::Critical);
        let rows = store.list(10).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].alert_type, "LEAK");
        assert_eq!(rows[0].severity, "CRITICAL");

        let output = logs.contents();
        assert!(output.contains("processing_alert"));
        assert!(output.contains("alert_recorded"));
    }

    #[tokio::test]
    async fn validation_failure_is_not_retried() {
        let (logs, _guard) = capture_logs();
        let store = FlakyStore::new(0);

        let err = process_alert_event(&store, event("NOT_A_REAL_TYPE"), 2)
            .await
            .unwrap_err();

        assert!(matches!(err, AlertError::Validation(ValidationError::AlertType)));
        assert_eq!(store.calls(), 0);

        let output = logs.contents();
        assert!(output.contains("validation_failed"));
        assert!(!output.contains("retrying_persist"));
    }

    #[tokio::test]
    async fn out_of_range_coordinates_fail_validation() {
        let store = FlakyStore::new(0);
        let mut bad = event("PRESSURE");
        bad.longitude = 999.9;

        let err = process_alert_event(&store, bad, 2).await.unwrap_err();
        assert!(matches!(err, AlertError::Validation(ValidationError::Longitude)));
    }

    #[tokio::test]
    async fn retries_then_succeeds() {
        let (logs, _guard) = capture_logs();
        let store = FlakyStore::new(1);

        let stored = process_alert_event(&store, event("LEAK"), 2).await.unwrap();

        assert_eq!(stored.alert.severity(), Severity::Critical);
        assert_eq!(store.calls(), 2);

        let output = logs.contents();
        assert_eq!(output.matches("retrying_persist").count(), 1);
        assert!(output.contains("alert_recorded"));
    }

    #[tokio::test]
    async fn gives_up_after_max_retries() {
        let (logs, _guard) = capture_logs();
        let store = FlakyStore::new(u32::MAX);

        let err = process_alert_event(&store, event("LEAK"), 2)
            .await
            .unwrap_err();

        assert!(matches!(err, AlertError::Persist { attempts: 3, .. }));
        assert_eq!(store.calls(), 3);

        let output = logs.contents();
        assert_eq!(output.matches("retrying_persist").count(), 2);
        assert!(output.contains("alert_processing_failed"));
    }

    #[tokio::test]
    async fn zero_retries_means_single_attempt() {
        let store = FlakyStore::new(1);
        let err = process_alert_event(&store, event("ACOUSTIC"), 0)
            .await
            .unwrap_err();

        assert!(matches!(err, AlertError::Persist { attempts: 1, .. }));
        assert_eq!(store.calls(), 1);
    }

    #[test]
    fn debug_level_is_hidden_at_info() {
        let buffer = LogBuffer::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(buffer.clone())
            .with_max_level(tracing::Level::INFO)
            .with_ansi(false)
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            tracing::debug!("debug_line");
            tracing::info!("info_line");
        });

        let output = buffer.contents();
        assert!(!output.contains("debug_line"));
        assert!(output.contains("info_line"));
    }
}
