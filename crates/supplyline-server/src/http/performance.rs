//! Derived-metrics endpoint.
//!
//! Reading a vendor's performance recomputes the four signals over its full
//! order history and appends the result as a new snapshot row; the stored
//! row is what the client receives.

use axum::extract::{Path, State};
use axum::Json;
use chrono::Utc;

use supplyline_core::error::SupplyError;
use supplyline_core::metrics;
use supplyline_core::model::HistoricalPerformance;

use crate::app_state::AppState;
use crate::auth::AuthUser;
use crate::http::ApiResult;

pub async fn vendor_performance(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(vendor_id): Path<i64>,
) -> ApiResult<Json<HistoricalPerformance>> {
    state
        .store()
        .get_vendor(vendor_id)
        .await?
        .ok_or(SupplyError::NotFound("Vendor"))?;

    let orders = state.store().orders_for_vendor(vendor_id).await?;
    let computed = metrics::compute(&orders);
    let snapshot = state
        .store()
        .append_snapshot(vendor_id, Utc::now(), &computed)
        .await?;

    tracing::debug!(
        vendor_id,
        orders = orders.len(),
        snapshot_id = snapshot.id,
        "performance snapshot appended"
    );
    Ok(Json(snapshot))
}
