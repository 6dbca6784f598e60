//! Vendor persistence.

use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use supplyline_core::error::{Result, SupplyError};
use supplyline_core::model::{NewVendor, Vendor};

use super::{map_read_err, map_write_err, SqliteStore};

const VENDOR_COLS: &str = "id, name, contact_details, address, vendor_code, \
     on_time_delivery_rate, quality_rating_avg, average_response_time, fulfillment_rate";

fn vendor_from_row(row: &SqliteRow) -> Result<Vendor> {
    Ok(Vendor {
        id: row.try_get("id").map_err(map_read_err)?,
        name: row.try_get("name").map_err(map_read_err)?,
        contact_details: row.try_get("contact_details").map_err(map_read_err)?,
        address: row.try_get("address").map_err(map_read_err)?,
        vendor_code: row.try_get("vendor_code").map_err(map_read_err)?,
        on_time_delivery_rate: row.try_get("on_time_delivery_rate").map_err(map_read_err)?,
        quality_rating_avg: row.try_get("quality_rating_avg").map_err(map_read_err)?,
        average_response_time: row.try_get("average_response_time").map_err(map_read_err)?,
        fulfillment_rate: row.try_get("fulfillment_rate").map_err(map_read_err)?,
    })
}

impl SqliteStore {
    pub async fn list_vendors(&self) -> Result<Vec<Vendor>> {
        let rows = sqlx::query(&format!("SELECT {VENDOR_COLS} FROM vendors ORDER BY id"))
            .fetch_all(self.pool())
            .await
            .map_err(map_read_err)?;
        rows.iter().map(vendor_from_row).collect()
    }

    pub async fn create_vendor(&self, input: &NewVendor) -> Result<Vendor> {
        let res = sqlx::query(
            "INSERT INTO vendors (name, contact_details, address, vendor_code, \
             on_time_delivery_rate, quality_rating_avg, average_response_time, fulfillment_rate) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&input.name)
        .bind(&input.contact_details)
        .bind(&input.address)
        .bind(&input.vendor_code)
        .bind(input.on_time_delivery_rate)
        .bind(input.quality_rating_avg)
        .bind(input.average_response_time)
        .bind(input.fulfillment_rate)
        .execute(self.pool())
        .await
        .map_err(|e| map_write_err(e, "vendor_code"))?;

        let id = res.last_insert_rowid();
        self.get_vendor(id)
            .await?
            .ok_or_else(|| SupplyError::Internal("vendor vanished after insert".into()))
    }

    pub async fn get_vendor(&self, id: i64) -> Result<Option<Vendor>> {
        let row = sqlx::query(&format!("SELECT {VENDOR_COLS} FROM vendors WHERE id = ?"))
            .bind(id)
            .fetch_optional(self.pool())
            .await
            .map_err(map_read_err)?;
        row.as_ref().map(vendor_from_row).transpose()
    }

    pub async fn update_vendor(&self, id: i64, input: &NewVendor) -> Result<Option<Vendor>> {
        let res = sqlx::query(
            "UPDATE vendors SET name = ?, contact_details = ?, address = ?, vendor_code = ?, \
             on_time_delivery_rate = ?, quality_rating_avg = ?, average_response_time = ?, \
             fulfillment_rate = ? WHERE id = ?",
        )
        .bind(&input.name)
        .bind(&input.contact_details)
        .bind(&input.address)
        .bind(&input.vendor_code)
        .bind(input.on_time_delivery_rate)
        .bind(input.quality_rating_avg)
        .bind(input.average_response_time)
        .bind(input.fulfillment_rate)
        .bind(id)
        .execute(self.pool())
        .await
        .map_err(|e| map_write_err(e, "vendor_code"))?;

        if res.rows_affected() == 0 {
            return Ok(None);
        }
        self.get_vendor(id).await
    }

    pub async fn delete_vendor(&self, id: i64) -> Result<bool> {
        let res = sqlx::query("DELETE FROM vendors WHERE id = ?")
            .bind(id)
            .execute(self.pool())
            .await
            .map_err(map_read_err)?;
        Ok(res.rows_affected() > 0)
    }
}
