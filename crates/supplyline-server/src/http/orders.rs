//! Purchase-order CRUD handlers.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use supplyline_core::error::SupplyError;
use supplyline_core::model::{PurchaseOrder, PurchaseOrderDraft};

use crate::app_state::AppState;
use crate::auth::AuthUser;
use crate::http::{reject_body, ApiResult};

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    /// Case-insensitive substring match on the owning vendor's name.
    #[serde(default)]
    pub search: Option<String>,
}

pub async fn list(
    _user: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<Vec<PurchaseOrder>>> {
    let orders = state.store().list_orders(params.search.as_deref()).await?;
    Ok(Json(orders))
}

pub async fn create(
    _user: AuthUser,
    State(state): State<AppState>,
    payload: Result<Json<PurchaseOrderDraft>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<PurchaseOrder>)> {
    let Json(draft) = payload.map_err(reject_body)?;
    let input = draft.validate()?;
    let order = state.store().create_order(&input).await?;
    tracing::info!(order_id = order.id, po_number = %order.po_number, "purchase order created");
    Ok((StatusCode::CREATED, Json(order)))
}

pub async fn get(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(po_id): Path<i64>,
) -> ApiResult<Json<PurchaseOrder>> {
    let order = state
        .store()
        .get_order(po_id)
        .await?
        .ok_or(SupplyError::NotFound("Purchase order"))?;
    Ok(Json(order))
}

pub async fn update(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(po_id): Path<i64>,
    payload: Result<Json<PurchaseOrderDraft>, JsonRejection>,
) -> ApiResult<Json<PurchaseOrder>> {
    let Json(draft) = payload.map_err(reject_body)?;
    let input = draft.validate()?;
    let order = state
        .store()
        .update_order(po_id, &input)
        .await?
        .ok_or(SupplyError::NotFound("Purchase order"))?;
    Ok(Json(order))
}

pub async fn delete(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(po_id): Path<i64>,
) -> ApiResult<StatusCode> {
    if !state.store().delete_order(po_id).await? {
        return Err(SupplyError::NotFound("Purchase order").into());
    }
    tracing::info!(order_id = po_id, "purchase order deleted");
    Ok(StatusCode::NO_CONTENT)
}
