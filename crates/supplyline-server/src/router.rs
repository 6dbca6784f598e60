//! Axum router wiring.
//!
//! `/token` and the ops routes are unauthenticated; everything under `/api`
//! requires a bearer token (enforced per handler by the `AuthUser`
//! extractor).

use axum::routing::{get, post};
use axum::{middleware, Router};

use crate::app_state::AppState;
use crate::http::{orders, performance, token, vendors};
use crate::{obs, ops};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/token", post(token::obtain))
        .route("/api/vendors", get(vendors::list).post(vendors::create))
        .route(
            "/api/vendors/:vendor_id",
            get(vendors::get).put(vendors::update).delete(vendors::delete),
        )
        .route(
            "/api/vendors/:vendor_id/performance",
            get(performance::vendor_performance),
        )
        .route("/api/purchase_orders", get(orders::list).post(orders::create))
        .route(
            "/api/purchase_orders/:po_id",
            get(orders::get).put(orders::update).delete(orders::delete),
        )
        .route("/healthz", get(ops::healthz))
        .route("/readyz", get(ops::readyz))
        .route("/metrics", get(ops::metrics))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            obs::track_requests,
        ))
        .with_state(state)
}
