/*
 * Responsibility
 * - alerts table DDL + insert/list via SQLx
 * - Connection setup from DATABASE_URL (a `.db` file path, created if missing)
 */
use async_trait::async_trait;
use serde::Serialize;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{FromRow, SqlitePool};

use crate::domain::Alert;
use crate::repos::error::RepoError;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AlertRow {
    pub id: i64,
    pub timestamp: String,
    pub site_id: String,
    pub alert_type: String,
    pub severity: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// Storage seam for alert rows.
///
/// Implementations must be shareable across requests (`Arc<dyn AlertStore>`).
#[async_trait]
pub trait AlertStore: Send + Sync {
    /// Insert one alert and return its row id.
    async fn insert(&self, alert: &Alert) -> Result<i64, RepoError>;

    /// Newest first.
    async fn list(&self, limit: i64) -> Result<Vec<AlertRow>, RepoError>;
}

/// Open (or create) the SQLite database named by `database_url`.
///
/// Accepts a bare path (`alerts.db`) or a `sqlite:` URL.
pub async fn connect(database_url: &str) -> Result<SqlitePool, RepoError> {
    let path = database_url
        .strip_prefix("sqlite://")
        .or_else(|| database_url.strip_prefix("sqlite:"))
        .unwrap_or(database_url);

    let options = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    Ok(pool)
}

/// Create the alerts table if it does not exist.
pub async fn initialize(pool: &SqlitePool) -> Result<(), RepoError> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS alerts (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            timestamp TEXT NOT NULL,
            site_id TEXT NOT NULL,
            alert_type TEXT NOT NULL,
            severity TEXT NOT NULL,
            latitude REAL NOT NULL,
            longitude REAL NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn insert(pool: &SqlitePool, alert: &Alert) -> Result<i64, RepoError> {
    let result = sqlx::query(
        r#"
        INSERT INTO alerts (timestamp, site_id, alert_type, severity, latitude, longitude)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6)
        "#,
    )
    .bind(alert.timestamp())
    .bind(alert.site_id())
    .bind(alert.alert_type().as_str())
    .bind(alert.severity().as_str())
    .bind(alert.latitude())
    .bind(alert.longitude())
    .execute(pool)
    .await?;

    Ok(result.last_insert_rowid())
}

pub async fn list(pool: &SqlitePool, limit: i64) -> Result<Vec<AlertRow>, RepoError> {
    let rows = sqlx::query_as::<_, AlertRow>(
        r#"
        SELECT id, timestamp, site_id, alert_type, severity, latitude, longitude
        FROM alerts
        ORDER BY id DESC
        LIMIT ?1
        "#,
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

#[derive(Clone, Debug)]
pub struct SqliteAlertStore {
    pool: SqlitePool,
}

impl SqliteAlertStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AlertStore for SqliteAlertStore {
    async fn insert(&self, alert: &Alert) -> Result<i64, RepoError> {
        insert(&self.pool, alert).await
    }

    async fn list(&self, limit: i64) -> Result<Vec<AlertRow>, RepoError> {
        list(&self.pool, limit).await
    }
}
