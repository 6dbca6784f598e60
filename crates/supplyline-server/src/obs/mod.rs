//! Lightweight in-process observability.
//!
//! Metrics are stored as atomics behind `DashMap` label maps and rendered by
//! the `/metrics` handler; `track_requests` is the axum middleware feeding
//! the registry.

pub mod metrics;

use std::time::Instant;

use axum::extract::{MatchedPath, Request, State};
use axum::middleware::Next;
use axum::response::Response;

use crate::app_state::AppState;

/// Per-request accounting: count by route/method/status, time by route.
pub async fn track_requests(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Response {
    let method = req.method().to_string();
    // Label by route template, not raw path, to keep cardinality bounded.
    let route = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());

    let start = Instant::now();
    let resp = next.run(req).await;

    let status = resp.status().as_u16().to_string();
    state
        .metrics()
        .http_requests
        .inc(&[("route", &route), ("method", &method), ("status", &status)]);
    state
        .metrics()
        .request_duration
        .observe(&[("route", &route)], start.elapsed());
    resp
}
