//! Entity types and input validation.
//!
//! Wire field names follow the original public API contract: primary keys are
//! `vendorID` / `purchase_orderID` / `performanceID`, and foreign keys are
//! serialized as `vendor`. Everything else maps one-to-one.
//!
//! Inputs arrive as `*Draft` values in which even required fields are
//! optional; `validate()` turns a draft into its checked `New*` form or
//! returns a per-field error map, so a single response can report every
//! problem at once.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Result, SupplyError};

pub const VENDOR_NAME_MAX: usize = 100;
pub const VENDOR_CODE_MAX: usize = 50;
pub const PO_NUMBER_MAX: usize = 100;

/// Purchase-order lifecycle status. Fixed set, no transitions enforced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Completed,
    Cancelled,
}

impl OrderStatus {
    /// Storage/wire representation.
    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    /// Parse the storage/wire representation.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(OrderStatus::Pending),
            "completed" => Some(OrderStatus::Completed),
            "cancelled" => Some(OrderStatus::Cancelled),
            _ => None,
        }
    }
}

/// Supplier entity with rolling performance fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vendor {
    #[serde(rename = "vendorID")]
    pub id: i64,
    pub name: Option<String>,
    pub contact_details: Option<String>,
    pub address: Option<String>,
    pub vendor_code: String,
    pub on_time_delivery_rate: Option<f64>,
    pub quality_rating_avg: Option<f64>,
    pub average_response_time: Option<f64>,
    pub fulfillment_rate: Option<f64>,
}

/// A transaction record against a vendor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaseOrder {
    #[serde(rename = "purchase_orderID")]
    pub id: i64,
    pub po_number: String,
    #[serde(rename = "vendor")]
    pub vendor_id: i64,
    pub order_date: Option<DateTime<Utc>>,
    pub delivery_date: Option<DateTime<Utc>>,
    pub items: Option<Value>,
    pub quantity: Option<i64>,
    pub status: OrderStatus,
    pub quality_rating: Option<f64>,
    pub issue_date: DateTime<Utc>,
    pub acknowledgment_date: Option<DateTime<Utc>>,
}

/// Append-only snapshot of computed vendor metrics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoricalPerformance {
    #[serde(rename = "performanceID")]
    pub id: i64,
    #[serde(rename = "vendor")]
    pub vendor_id: i64,
    pub date: DateTime<Utc>,
    pub on_time_delivery_rate: Option<f64>,
    pub quality_rating_avg: Option<f64>,
    pub average_response_time: Option<f64>,
    pub fulfillment_rate: Option<f64>,
}

/// Incoming vendor body (create and full update).
#[derive(Debug, Default, Clone, Deserialize)]
pub struct VendorDraft {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub contact_details: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub vendor_code: Option<String>,
    #[serde(default)]
    pub on_time_delivery_rate: Option<f64>,
    #[serde(default)]
    pub quality_rating_avg: Option<f64>,
    #[serde(default)]
    pub average_response_time: Option<f64>,
    #[serde(default)]
    pub fulfillment_rate: Option<f64>,
}

/// Checked vendor input.
#[derive(Debug, Clone)]
pub struct NewVendor {
    pub name: Option<String>,
    pub contact_details: Option<String>,
    pub address: Option<String>,
    pub vendor_code: String,
    pub on_time_delivery_rate: Option<f64>,
    pub quality_rating_avg: Option<f64>,
    pub average_response_time: Option<f64>,
    pub fulfillment_rate: Option<f64>,
}

impl VendorDraft {
    pub fn validate(self) -> Result<NewVendor> {
        let mut fields = BTreeMap::new();

        let vendor_code = match self.vendor_code {
            Some(code) if !code.trim().is_empty() => {
                if code.len() > VENDOR_CODE_MAX {
                    fields.insert(
                        "vendor_code".into(),
                        format!("must not exceed {VENDOR_CODE_MAX} characters"),
                    );
                }
                Some(code)
            }
            _ => {
                fields.insert("vendor_code".into(), "required".into());
                None
            }
        };

        if let Some(name) = &self.name {
            if name.len() > VENDOR_NAME_MAX {
                fields.insert(
                    "name".into(),
                    format!("must not exceed {VENDOR_NAME_MAX} characters"),
                );
            }
        }

        if !fields.is_empty() {
            return Err(SupplyError::Validation(fields));
        }

        // vendor_code is Some here; the error map above is non-empty otherwise.
        let vendor_code = vendor_code.ok_or_else(|| {
            SupplyError::Internal("vendor_code missing after validation".into())
        })?;

        Ok(NewVendor {
            name: self.name,
            contact_details: self.contact_details,
            address: self.address,
            vendor_code,
            on_time_delivery_rate: self.on_time_delivery_rate,
            quality_rating_avg: self.quality_rating_avg,
            average_response_time: self.average_response_time,
            fulfillment_rate: self.fulfillment_rate,
        })
    }
}

/// Incoming purchase-order body (create and full update).
#[derive(Debug, Default, Clone, Deserialize)]
pub struct PurchaseOrderDraft {
    #[serde(default)]
    pub po_number: Option<String>,
    #[serde(default, rename = "vendor")]
    pub vendor_id: Option<i64>,
    #[serde(default)]
    pub order_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub delivery_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub items: Option<Value>,
    #[serde(default)]
    pub quantity: Option<i64>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub quality_rating: Option<f64>,
    #[serde(default)]
    pub issue_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub acknowledgment_date: Option<DateTime<Utc>>,
}

/// Checked purchase-order input.
#[derive(Debug, Clone)]
pub struct NewPurchaseOrder {
    pub po_number: String,
    pub vendor_id: i64,
    pub order_date: Option<DateTime<Utc>>,
    pub delivery_date: Option<DateTime<Utc>>,
    pub items: Option<Value>,
    pub quantity: Option<i64>,
    pub status: OrderStatus,
    pub quality_rating: Option<f64>,
    pub issue_date: DateTime<Utc>,
    pub acknowledgment_date: Option<DateTime<Utc>>,
}

impl PurchaseOrderDraft {
    pub fn validate(self) -> Result<NewPurchaseOrder> {
        let mut fields = BTreeMap::new();

        let po_number = match self.po_number {
            Some(n) if !n.trim().is_empty() => {
                if n.len() > PO_NUMBER_MAX {
                    fields.insert(
                        "po_number".into(),
                        format!("must not exceed {PO_NUMBER_MAX} characters"),
                    );
                }
                Some(n)
            }
            _ => {
                fields.insert("po_number".into(), "required".into());
                None
            }
        };

        if self.vendor_id.is_none() {
            fields.insert("vendor".into(), "required".into());
        }

        let status = match self.status.as_deref() {
            Some(s) => match OrderStatus::parse(s) {
                Some(st) => Some(st),
                None => {
                    fields.insert("status".into(), format!("\"{s}\" is not a valid choice"));
                    None
                }
            },
            None => {
                fields.insert("status".into(), "required".into());
                None
            }
        };

        if self.issue_date.is_none() {
            fields.insert("issue_date".into(), "required".into());
        }

        if !fields.is_empty() {
            return Err(SupplyError::Validation(fields));
        }

        match (po_number, self.vendor_id, status, self.issue_date) {
            (Some(po_number), Some(vendor_id), Some(status), Some(issue_date)) => {
                Ok(NewPurchaseOrder {
                    po_number,
                    vendor_id,
                    order_date: self.order_date,
                    delivery_date: self.delivery_date,
                    items: self.items,
                    quantity: self.quantity,
                    status,
                    quality_rating: self.quality_rating,
                    issue_date,
                    acknowledgment_date: self.acknowledgment_date,
                })
            }
            _ => Err(SupplyError::Internal(
                "required order field missing after validation".into(),
            )),
        }
    }
}
