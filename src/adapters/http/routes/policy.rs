//! Admin policy routes. Reads are open to the billing core's consumers;
//! writes are the single admin mutation path.

use axum::{Json, Router, extract::State, response::IntoResponse, routing::get};

use crate::{
    adapters::http::app_state::AppState,
    app_error::AppResult,
    application::use_cases::policy::UpdatePolicyInput,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/policy", get(get_policy).put(update_policy))
}

/// GET /api/admin/policy
async fn get_policy(State(app_state): State<AppState>) -> AppResult<impl IntoResponse> {
    let policy = app_state.policy_use_cases.get().await?;
    Ok(Json(policy))
}

/// PUT /api/admin/policy
async fn update_policy(
    State(app_state): State<AppState>,
    Json(input): Json<UpdatePolicyInput>,
) -> AppResult<impl IntoResponse> {
    let policy = app_state.policy_use_cases.update(input).await?;
    Ok(Json(policy))
}
