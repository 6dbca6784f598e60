//! Purchase-order persistence.

use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use supplyline_core::error::{Result, SupplyError};
use supplyline_core::model::{NewPurchaseOrder, OrderStatus, PurchaseOrder};

use super::{map_read_err, map_write_err, opt_ts, parse_opt_ts, parse_ts, to_ts, SqliteStore};

const ORDER_COLS: &str = "id, po_number, vendor_id, order_date, delivery_date, items, \
     quantity, status, quality_rating, issue_date, acknowledgment_date";

pub(crate) fn order_from_row(row: &SqliteRow) -> Result<PurchaseOrder> {
    let status: String = row.try_get("status").map_err(map_read_err)?;
    let status = OrderStatus::parse(&status)
        .ok_or_else(|| SupplyError::Internal(format!("corrupt order status {status:?}")))?;

    let items: Option<String> = row.try_get("items").map_err(map_read_err)?;
    let items = items
        .as_deref()
        .map(serde_json::from_str)
        .transpose()
        .map_err(|e| SupplyError::Internal(format!("corrupt order items: {e}")))?;

    let issue_date: String = row.try_get("issue_date").map_err(map_read_err)?;

    Ok(PurchaseOrder {
        id: row.try_get("id").map_err(map_read_err)?,
        po_number: row.try_get("po_number").map_err(map_read_err)?,
        vendor_id: row.try_get("vendor_id").map_err(map_read_err)?,
        order_date: parse_opt_ts(row.try_get("order_date").map_err(map_read_err)?)?,
        delivery_date: parse_opt_ts(row.try_get("delivery_date").map_err(map_read_err)?)?,
        items,
        quantity: row.try_get("quantity").map_err(map_read_err)?,
        status,
        quality_rating: row.try_get("quality_rating").map_err(map_read_err)?,
        issue_date: parse_ts(&issue_date)?,
        acknowledgment_date: parse_opt_ts(
            row.try_get("acknowledgment_date").map_err(map_read_err)?,
        )?,
    })
}

impl SqliteStore {
    /// List orders, optionally filtered by a case-insensitive substring of
    /// the owning vendor's name.
    pub async fn list_orders(&self, search: Option<&str>) -> Result<Vec<PurchaseOrder>> {
        let rows = match search {
            Some(needle) => {
                sqlx::query(&format!(
                    "SELECT {ORDER_COLS} FROM purchase_orders \
                     WHERE vendor_id IN (SELECT id FROM vendors \
                         WHERE LOWER(name) LIKE '%' || LOWER(?) || '%') \
                     ORDER BY id"
                ))
                .bind(needle)
                .fetch_all(self.pool())
                .await
            }
            None => {
                sqlx::query(&format!("SELECT {ORDER_COLS} FROM purchase_orders ORDER BY id"))
                    .fetch_all(self.pool())
                    .await
            }
        }
        .map_err(map_read_err)?;

        rows.iter().map(order_from_row).collect()
    }

    pub async fn create_order(&self, input: &NewPurchaseOrder) -> Result<PurchaseOrder> {
        let res = sqlx::query(
            "INSERT INTO purchase_orders (po_number, vendor_id, order_date, delivery_date, \
             items, quantity, status, quality_rating, issue_date, acknowledgment_date) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&input.po_number)
        .bind(input.vendor_id)
        .bind(opt_ts(&input.order_date))
        .bind(opt_ts(&input.delivery_date))
        .bind(input.items.as_ref().map(|v| v.to_string()))
        .bind(input.quantity)
        .bind(input.status.as_str())
        .bind(input.quality_rating)
        .bind(to_ts(&input.issue_date))
        .bind(opt_ts(&input.acknowledgment_date))
        .execute(self.pool())
        .await
        .map_err(|e| map_write_err(e, "po_number"))?;

        let id = res.last_insert_rowid();
        self.get_order(id)
            .await?
            .ok_or_else(|| SupplyError::Internal("order vanished after insert".into()))
    }

    pub async fn get_order(&self, id: i64) -> Result<Option<PurchaseOrder>> {
        let row = sqlx::query(&format!("SELECT {ORDER_COLS} FROM purchase_orders WHERE id = ?"))
            .bind(id)
            .fetch_optional(self.pool())
            .await
            .map_err(map_read_err)?;
        row.as_ref().map(order_from_row).transpose()
    }

    pub async fn update_order(
        &self,
        id: i64,
        input: &NewPurchaseOrder,
    ) -> Result<Option<PurchaseOrder>> {
        let res = sqlx::query(
            "UPDATE purchase_orders SET po_number = ?, vendor_id = ?, order_date = ?, \
             delivery_date = ?, items = ?, quantity = ?, status = ?, quality_rating = ?, \
             issue_date = ?, acknowledgment_date = ? WHERE id = ?",
        )
        .bind(&input.po_number)
        .bind(input.vendor_id)
        .bind(opt_ts(&input.order_date))
        .bind(opt_ts(&input.delivery_date))
        .bind(input.items.as_ref().map(|v| v.to_string()))
        .bind(input.quantity)
        .bind(input.status.as_str())
        .bind(input.quality_rating)
        .bind(to_ts(&input.issue_date))
        .bind(opt_ts(&input.acknowledgment_date))
        .bind(id)
        .execute(self.pool())
        .await
        .map_err(|e| map_write_err(e, "po_number"))?;

        if res.rows_affected() == 0 {
            return Ok(None);
        }
        self.get_order(id).await
    }

    pub async fn delete_order(&self, id: i64) -> Result<bool> {
        let res = sqlx::query("DELETE FROM purchase_orders WHERE id = ?")
            .bind(id)
            .execute(self.pool())
            .await
            .map_err(map_read_err)?;
        Ok(res.rows_affected() > 0)
    }
}
