//! Promo validation routes. The multi-step authoring wizard lives in the
//! dashboard; only the redemption math is served here.

use axum::{Json, Router, extract::State, response::IntoResponse, routing::post};
use serde::Deserialize;
use uuid::Uuid;

use crate::{adapters::http::app_state::AppState, app_error::AppResult};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/validate", post(validate_promo))
        .route("/redeem", post(redeem_promo))
}

#[derive(Deserialize)]
struct PromoPayload {
    code: String,
    user_id: Uuid,
    subtotal_cents: i64,
}

/// POST /api/promos/validate
async fn validate_promo(
    State(app_state): State<AppState>,
    Json(payload): Json<PromoPayload>,
) -> AppResult<impl IntoResponse> {
    let result = app_state
        .promo_use_cases
        .validate(&payload.code, payload.user_id, payload.subtotal_cents)
        .await?;
    Ok(Json(result))
}

/// POST /api/promos/redeem
async fn redeem_promo(
    State(app_state): State<AppState>,
    Json(payload): Json<PromoPayload>,
) -> AppResult<impl IntoResponse> {
    let result = app_state
        .promo_use_cases
        .redeem(&payload.code, payload.user_id, payload.subtotal_cents)
        .await?;
    Ok(Json(result))
}
