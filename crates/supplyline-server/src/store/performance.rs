//! Historical-performance persistence (append-only).

use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use supplyline_core::error::{Result, SupplyError};
use supplyline_core::metrics::PerformanceMetrics;
use supplyline_core::model::{HistoricalPerformance, PurchaseOrder};

use super::orders::order_from_row;
use super::{map_read_err, map_write_err, parse_ts, to_ts, SqliteStore};

const SNAPSHOT_COLS: &str = "id, vendor_id, date, on_time_delivery_rate, \
     quality_rating_avg, average_response_time, fulfillment_rate";

fn snapshot_from_row(row: &SqliteRow) -> Result<HistoricalPerformance> {
    let date: String = row.try_get("date").map_err(map_read_err)?;
    Ok(HistoricalPerformance {
        id: row.try_get("id").map_err(map_read_err)?,
        vendor_id: row.try_get("vendor_id").map_err(map_read_err)?,
        date: parse_ts(&date)?,
        on_time_delivery_rate: row.try_get("on_time_delivery_rate").map_err(map_read_err)?,
        quality_rating_avg: row.try_get("quality_rating_avg").map_err(map_read_err)?,
        average_response_time: row.try_get("average_response_time").map_err(map_read_err)?,
        fulfillment_rate: row.try_get("fulfillment_rate").map_err(map_read_err)?,
    })
}

impl SqliteStore {
    /// Full order history for one vendor, metric-calculator input.
    pub async fn orders_for_vendor(&self, vendor_id: i64) -> Result<Vec<PurchaseOrder>> {
        let rows = sqlx::query(
            "SELECT id, po_number, vendor_id, order_date, delivery_date, items, quantity, \
             status, quality_rating, issue_date, acknowledgment_date \
             FROM purchase_orders WHERE vendor_id = ? ORDER BY id",
        )
        .bind(vendor_id)
        .fetch_all(self.pool())
        .await
        .map_err(map_read_err)?;

        rows.iter().map(order_from_row).collect()
    }

    /// Append one computed snapshot and return the stored row.
    pub async fn append_snapshot(
        &self,
        vendor_id: i64,
        date: DateTime<Utc>,
        metrics: &PerformanceMetrics,
    ) -> Result<HistoricalPerformance> {
        let res = sqlx::query(
            "INSERT INTO historical_performance (vendor_id, date, on_time_delivery_rate, \
             quality_rating_avg, average_response_time, fulfillment_rate) \
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(vendor_id)
        .bind(to_ts(&date))
        .bind(metrics.on_time_delivery_rate)
        .bind(metrics.quality_rating_avg)
        .bind(metrics.average_response_time)
        .bind(metrics.fulfillment_rate)
        .execute(self.pool())
        .await
        .map_err(|e| map_write_err(e, "date"))?;

        let id = res.last_insert_rowid();
        let row = sqlx::query(&format!(
            "SELECT {SNAPSHOT_COLS} FROM historical_performance WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(self.pool())
        .await
        .map_err(map_read_err)?;

        row.as_ref()
            .map(snapshot_from_row)
            .transpose()?
            .ok_or_else(|| SupplyError::Internal("snapshot vanished after insert".into()))
    }

    /// Snapshots for one vendor, oldest first.
    pub async fn snapshots_for_vendor(&self, vendor_id: i64) -> Result<Vec<HistoricalPerformance>> {
        let rows = sqlx::query(&format!(
            "SELECT {SNAPSHOT_COLS} FROM historical_performance WHERE vendor_id = ? ORDER BY id"
        ))
        .bind(vendor_id)
        .fetch_all(self.pool())
        .await
        .map_err(map_read_err)?;

        rows.iter().map(snapshot_from_row).collect()
    }
}
