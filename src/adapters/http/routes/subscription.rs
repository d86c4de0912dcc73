//! Subscription routes: current plan resolution, provider approval
//! activation, cancellation, transition history.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    adapters::http::app_state::AppState,
    app_error::AppResult,
    application::ports::payment_provider::ProviderApproval,
    domain::entities::subscription::{Subscription, is_free_trial},
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/hosts/{host_id}/subscription", get(get_subscription))
        .route(
            "/hosts/{host_id}/subscription/activate",
            post(activate_subscription),
        )
        .route(
            "/hosts/{host_id}/subscription/cancel",
            post(cancel_subscription),
        )
        .route(
            "/hosts/{host_id}/subscription/events",
            get(get_subscription_events),
        )
}

#[derive(Serialize)]
struct SubscriptionResponse {
    id: Uuid,
    plan: String,
    price_cents: i64,
    status: String,
    start_date: i64,
    next_billing_date: Option<i64>,
    expiry_date: Option<i64>,
    has_premium: bool,
    is_free_trial: Option<bool>,
}

impl SubscriptionResponse {
    fn from_subscription(sub: &Subscription, account_created_at: Option<DateTime<Utc>>) -> Self {
        let now = Utc::now();
        Self {
            id: sub.id,
            plan: sub.plan.as_str().to_string(),
            price_cents: sub.price_cents,
            status: sub.status.as_str().to_string(),
            start_date: sub.start_date.timestamp(),
            next_billing_date: sub.next_billing_date.map(|d| d.timestamp()),
            expiry_date: sub.expiry_date.map(|d| d.timestamp()),
            has_premium: sub.has_premium(now),
            is_free_trial: account_created_at
                .map(|created| is_free_trial(sub.plan, created, now)),
        }
    }
}

#[derive(Deserialize)]
struct SubscriptionQuery {
    /// When provided, the response reports whether the host is inside the
    /// free-trial window.
    account_created_at: Option<DateTime<Utc>>,
}

/// GET /api/hosts/{host_id}/subscription
/// Resolves the current subscription; the read applies lazy expiry.
async fn get_subscription(
    State(app_state): State<AppState>,
    Path(host_id): Path<Uuid>,
    Query(query): Query<SubscriptionQuery>,
) -> AppResult<impl IntoResponse> {
    let sub = app_state
        .subscription_use_cases
        .current_subscription(host_id)
        .await?;
    Ok(Json(SubscriptionResponse::from_subscription(
        &sub,
        query.account_created_at,
    )))
}

/// POST /api/hosts/{host_id}/subscription/activate
/// Payment-provider approval callback; performs Standard -> Premium.
async fn activate_subscription(
    State(app_state): State<AppState>,
    Path(host_id): Path<Uuid>,
    Json(approval): Json<ProviderApproval>,
) -> AppResult<impl IntoResponse> {
    let sub = app_state
        .subscription_use_cases
        .activate_premium(host_id, &approval)
        .await?;
    Ok(Json(SubscriptionResponse::from_subscription(&sub, None)))
}

/// POST /api/hosts/{host_id}/subscription/cancel
async fn cancel_subscription(
    State(app_state): State<AppState>,
    Path(host_id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let sub = app_state.subscription_use_cases.cancel(host_id).await?;
    Ok(Json(SubscriptionResponse::from_subscription(&sub, None)))
}

#[derive(Serialize)]
struct SubscriptionEventResponse {
    event_type: String,
    previous_status: Option<String>,
    new_status: Option<String>,
    created_at: i64,
}

/// GET /api/hosts/{host_id}/subscription/events
async fn get_subscription_events(
    State(app_state): State<AppState>,
    Path(host_id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let sub = app_state
        .subscription_use_cases
        .current_subscription(host_id)
        .await?;
    let events = app_state.subscription_use_cases.events(sub.id).await?;
    let response: Vec<SubscriptionEventResponse> = events
        .into_iter()
        .map(|e| SubscriptionEventResponse {
            event_type: e.event_type,
            previous_status: e.previous_status.map(|s| s.as_str().to_string()),
            new_status: e.new_status.map(|s| s.as_str().to_string()),
            created_at: e.created_at.timestamp(),
        })
        .collect();
    Ok(Json(response))
}
