//! Vendor CRUD handlers.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use supplyline_core::error::SupplyError;
use supplyline_core::model::{Vendor, VendorDraft};

use crate::app_state::AppState;
use crate::auth::AuthUser;
use crate::http::{reject_body, ApiResult};

pub async fn list(
    _user: AuthUser,
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<Vendor>>> {
    Ok(Json(state.store().list_vendors().await?))
}

pub async fn create(
    _user: AuthUser,
    State(state): State<AppState>,
    payload: Result<Json<VendorDraft>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Vendor>)> {
    let Json(draft) = payload.map_err(reject_body)?;
    let input = draft.validate()?;
    let vendor = state.store().create_vendor(&input).await?;
    tracing::info!(vendor_id = vendor.id, code = %vendor.vendor_code, "vendor created");
    Ok((StatusCode::CREATED, Json(vendor)))
}

pub async fn get(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(vendor_id): Path<i64>,
) -> ApiResult<Json<Vendor>> {
    let vendor = state
        .store()
        .get_vendor(vendor_id)
        .await?
        .ok_or(SupplyError::NotFound("Vendor"))?;
    Ok(Json(vendor))
}

pub async fn update(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(vendor_id): Path<i64>,
    payload: Result<Json<VendorDraft>, JsonRejection>,
) -> ApiResult<Json<Vendor>> {
    let Json(draft) = payload.map_err(reject_body)?;
    let input = draft.validate()?;
    let vendor = state
        .store()
        .update_vendor(vendor_id, &input)
        .await?
        .ok_or(SupplyError::NotFound("Vendor"))?;
    Ok(Json(vendor))
}

pub async fn delete(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(vendor_id): Path<i64>,
) -> ApiResult<StatusCode> {
    if !state.store().delete_vendor(vendor_id).await? {
        return Err(SupplyError::NotFound("Vendor").into());
    }
    tracing::info!(vendor_id, "vendor deleted");
    Ok(StatusCode::NO_CONTENT)
}
