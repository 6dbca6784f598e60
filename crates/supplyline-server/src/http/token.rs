//! Token issuance: exchange username/password for a bearer token.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use supplyline_core::error::SupplyError;

use crate::app_state::AppState;
use crate::http::{reject_body, ApiResult};

#[derive(Debug, Deserialize)]
pub struct TokenRequest {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

pub async fn obtain(
    State(state): State<AppState>,
    payload: Result<Json<TokenRequest>, JsonRejection>,
) -> ApiResult<Json<TokenResponse>> {
    let Json(req) = payload.map_err(reject_body)?;

    let (username, password) = match (req.username, req.password) {
        (Some(u), Some(p)) => (u, p),
        _ => {
            return Err(SupplyError::BadRequest(
                "please provide both username and password".into(),
            )
            .into())
        }
    };

    if !state.credentials().verify(&username, &password) {
        state
            .metrics()
            .auth_failures
            .inc(&[("reason", "bad_credentials")]);
        return Err(SupplyError::AuthFailed.into());
    }

    let token = state.tokens().issue(&username);
    tracing::debug!(%username, "token issued");
    Ok(Json(TokenResponse { token }))
}
