//! SQLite-backed record store.
//!
//! Schema is bootstrapped at connect time with idempotent DDL; foreign keys
//! are enforced so deleting a vendor cascades to its orders and snapshots.
//! Timestamps are stored as RFC 3339 text, `items` as JSON text.

mod orders;
mod performance;
mod vendors;

use std::collections::BTreeMap;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

use supplyline_core::error::{Result, SupplyError};

use crate::config::DatabaseSection;

const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS vendors (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT,
        contact_details TEXT,
        address TEXT,
        vendor_code TEXT NOT NULL UNIQUE,
        on_time_delivery_rate REAL,
        quality_rating_avg REAL,
        average_response_time REAL,
        fulfillment_rate REAL
    )",
    "CREATE TABLE IF NOT EXISTS purchase_orders (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        po_number TEXT NOT NULL UNIQUE,
        vendor_id INTEGER NOT NULL REFERENCES vendors(id) ON DELETE CASCADE,
        order_date TEXT,
        delivery_date TEXT,
        items TEXT,
        quantity INTEGER,
        status TEXT NOT NULL,
        quality_rating REAL,
        issue_date TEXT NOT NULL,
        acknowledgment_date TEXT
    )",
    "CREATE INDEX IF NOT EXISTS idx_purchase_orders_vendor ON purchase_orders(vendor_id)",
    "CREATE TABLE IF NOT EXISTS historical_performance (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        vendor_id INTEGER NOT NULL REFERENCES vendors(id) ON DELETE CASCADE,
        date TEXT NOT NULL,
        on_time_delivery_rate REAL,
        quality_rating_avg REAL,
        average_response_time REAL,
        fulfillment_rate REAL
    )",
    "CREATE INDEX IF NOT EXISTS idx_historical_performance_vendor ON historical_performance(vendor_id)",
];

#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open the pool and bootstrap the schema.
    pub async fn connect(cfg: &DatabaseSection) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(&cfg.url)
            .map_err(|e| SupplyError::BadRequest(format!("invalid database url: {e}")))?
            .create_if_missing(true)
            .foreign_keys(true);

        // An in-memory database exists per connection; more than one pool
        // connection would see disjoint stores.
        let max_connections = if cfg.url.contains(":memory:") || cfg.url.contains("mode=memory") {
            1
        } else {
            cfg.max_connections
        };

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await
            .map_err(|e| SupplyError::Internal(format!("database connect failed: {e}")))?;

        let store = Self { pool };
        store.bootstrap().await?;
        Ok(store)
    }

    async fn bootstrap(&self) -> Result<()> {
        for stmt in SCHEMA {
            sqlx::query(stmt)
                .execute(&self.pool)
                .await
                .map_err(|e| SupplyError::Internal(format!("schema bootstrap failed: {e}")))?;
        }
        tracing::debug!("record store schema ready");
        Ok(())
    }

    /// Liveness probe for readiness checks.
    pub async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map(|_| ())
            .map_err(|e| SupplyError::Internal(format!("database ping failed: {e}")))
    }

    pub(crate) fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

/// Map a write failure to the client-facing surface: constraint violations
/// are validation problems (the unique column differs per table), everything
/// else is internal.
pub(crate) fn map_write_err(err: sqlx::Error, unique_field: &'static str) -> SupplyError {
    if let sqlx::Error::Database(db) = &err {
        match db.kind() {
            sqlx::error::ErrorKind::UniqueViolation => {
                let mut fields = BTreeMap::new();
                fields.insert(unique_field.to_string(), "already exists".to_string());
                return SupplyError::Validation(fields);
            }
            sqlx::error::ErrorKind::ForeignKeyViolation => {
                let mut fields = BTreeMap::new();
                fields.insert("vendor".to_string(), "unknown vendor".to_string());
                return SupplyError::Validation(fields);
            }
            _ => {}
        }
    }
    SupplyError::Internal(format!("database error: {err}"))
}

pub(crate) fn map_read_err(err: sqlx::Error) -> SupplyError {
    SupplyError::Internal(format!("database error: {err}"))
}

pub(crate) fn to_ts(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

pub(crate) fn opt_ts(dt: &Option<DateTime<Utc>>) -> Option<String> {
    dt.as_ref().map(to_ts)
}

pub(crate) fn parse_ts(s: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| SupplyError::Internal(format!("corrupt timestamp {s:?}: {e}")))
}

pub(crate) fn parse_opt_ts(s: Option<String>) -> Result<Option<DateTime<Utc>>> {
    s.as_deref().map(parse_ts).transpose()
}
