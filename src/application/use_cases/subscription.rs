use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    app_error::{AppError, AppResult},
    application::ports::payment_provider::ProviderApproval,
    domain::entities::{
        subscription::{Subscription, SubscriptionStatus, resolve},
        subscription_event::SubscriptionEvent,
    },
};

// ============================================================================
// Repository Traits
// ============================================================================

#[async_trait]
pub trait SubscriptionRepo: Send + Sync {
    /// Latest non-expired record for a host, if any.
    async fn get_current_by_host(&self, host_id: Uuid) -> AppResult<Option<Subscription>>;

    /// Every record for a host, expired episodes included. Feeds revenue
    /// reconstruction, which is deliberately status-blind.
    async fn list_by_host(&self, host_id: Uuid) -> AppResult<Vec<Subscription>>;

    async fn insert(&self, subscription: &Subscription) -> AppResult<()>;

    /// Apply the lazy-expiry downgrade, guarded on the row still being in
    /// `cancelling`. Returns whether a row changed; a concurrent duplicate
    /// sees `false` and treats it as a no-op.
    async fn mark_expired_if_cancelling(&self, id: Uuid) -> AppResult<bool>;

    /// Move an active premium row to `cancelling` with the given expiry,
    /// guarded on the row still being `active`.
    async fn mark_cancelling_if_active(
        &self,
        id: Uuid,
        expiry_date: DateTime<Utc>,
    ) -> AppResult<bool>;
}

#[derive(Debug, Clone)]
pub struct AppendSubscriptionEventInput {
    pub subscription_id: Uuid,
    pub event_type: String,
    pub previous_status: Option<SubscriptionStatus>,
    pub new_status: Option<SubscriptionStatus>,
    pub metadata: serde_json::Value,
}

#[async_trait]
pub trait SubscriptionEventRepo: Send + Sync {
    async fn append(&self, input: &AppendSubscriptionEventInput) -> AppResult<()>;
    async fn list_by_subscription(
        &self,
        subscription_id: Uuid,
    ) -> AppResult<Vec<SubscriptionEvent>>;
}

// ============================================================================
// Use Cases
// ============================================================================

#[derive(Clone)]
pub struct SubscriptionUseCases {
    subscription_repo: Arc<dyn SubscriptionRepo>,
    event_repo: Arc<dyn SubscriptionEventRepo>,
    /// Price of the premium plan. Zero means the plan is not configured;
    /// activation then fails loudly instead of granting a free premium.
    premium_price_cents: i64,
    /// Provider-side reference of the premium plan.
    premium_plan_ref: String,
}

impl SubscriptionUseCases {
    pub fn new(
        subscription_repo: Arc<dyn SubscriptionRepo>,
        event_repo: Arc<dyn SubscriptionEventRepo>,
        premium_price_cents: i64,
        premium_plan_ref: String,
    ) -> Self {
        Self {
            subscription_repo,
            event_repo,
            premium_price_cents,
            premium_plan_ref,
        }
    }

    /// Resolve the host's current subscription. The read may trigger up to
    /// one write: persisting the implicit Standard default on first
    /// resolution, or the status-guarded lazy-expiry downgrade.
    pub async fn current_subscription(&self, host_id: Uuid) -> AppResult<Subscription> {
        let existing = self.subscription_repo.get_current_by_host(host_id).await?;
        let resolution = resolve(host_id, existing, Utc::now());

        if resolution.created_default {
            self.subscription_repo
                .insert(&resolution.subscription)
                .await?;
            self.event_repo
                .append(&AppendSubscriptionEventInput {
                    subscription_id: resolution.subscription.id,
                    event_type: "created".to_string(),
                    previous_status: None,
                    new_status: Some(SubscriptionStatus::Active),
                    metadata: serde_json::json!({"plan": resolution.subscription.plan}),
                })
                .await?;
        }

        if resolution.expired {
            let applied = self
                .subscription_repo
                .mark_expired_if_cancelling(resolution.subscription.id)
                .await?;
            if applied {
                self.event_repo
                    .append(&AppendSubscriptionEventInput {
                        subscription_id: resolution.subscription.id,
                        event_type: "expired".to_string(),
                        previous_status: Some(SubscriptionStatus::Cancelling),
                        new_status: Some(SubscriptionStatus::Expired),
                        metadata: serde_json::json!({}),
                    })
                    .await?;
            } else {
                tracing::debug!(
                    subscription_id = %resolution.subscription.id,
                    "Expiry downgrade already applied by a concurrent read"
                );
            }
        }

        Ok(resolution.subscription)
    }

    /// Whether the host currently holds Premium entitlements.
    pub async fn has_premium(&self, host_id: Uuid) -> AppResult<bool> {
        let sub = self.current_subscription(host_id).await?;
        Ok(sub.has_premium(Utc::now()))
    }

    /// `StandardActive → PremiumActive` on a provider approval. A
    /// misconfigured premium plan aborts the operation; nothing about the
    /// host's prior plan is touched on any failure path.
    pub async fn activate_premium(
        &self,
        host_id: Uuid,
        approval: &ProviderApproval,
    ) -> AppResult<Subscription> {
        if self.premium_price_cents <= 0 || self.premium_plan_ref.is_empty() {
            return Err(AppError::Configuration(
                "Premium plan price or reference is not configured".into(),
            ));
        }
        if approval.plan_reference != self.premium_plan_ref {
            return Err(AppError::Configuration(format!(
                "Approval references unknown plan '{}'",
                approval.plan_reference
            )));
        }
        if approval.provider_subscription_id.as_str().is_empty() {
            return Err(AppError::Validation(
                "Approval is missing a provider subscription reference".into(),
            ));
        }

        let current = self.current_subscription(host_id).await?;
        let now = Utc::now();
        if current.has_premium(now) {
            return Err(AppError::Validation(
                "Host already has an active premium subscription".into(),
            ));
        }

        let subscription = Subscription::premium_active(
            host_id,
            self.premium_price_cents,
            approval.provider_subscription_id.as_str().to_string(),
            now,
        );
        self.subscription_repo.insert(&subscription).await?;

        self.event_repo
            .append(&AppendSubscriptionEventInput {
                subscription_id: subscription.id,
                event_type: "activated".to_string(),
                previous_status: Some(current.status),
                new_status: Some(SubscriptionStatus::Active),
                metadata: serde_json::json!({
                    "provider_subscription_id": approval.provider_subscription_id.as_str(),
                    "provider_order_id": approval.provider_order_id.as_str(),
                }),
            })
            .await?;

        tracing::info!(host_id = %host_id, subscription_id = %subscription.id, "Premium subscription activated");
        Ok(subscription)
    }

    /// `PremiumActive → PremiumCancelling`. Entitlement survives until the
    /// expiry date; there is no path back to active from here.
    pub async fn cancel(&self, host_id: Uuid) -> AppResult<Subscription> {
        let current = self.current_subscription(host_id).await?;
        let now = Utc::now();

        let cancelled = current
            .clone()
            .cancel(now)
            .map_err(AppError::Validation)?;
        let expiry = cancelled
            .expiry_date
            .ok_or_else(|| AppError::Internal("Cancellation produced no expiry date".into()))?;

        let applied = self
            .subscription_repo
            .mark_cancelling_if_active(current.id, expiry)
            .await?;
        if !applied {
            return Err(AppError::Validation(
                "Subscription is no longer active".into(),
            ));
        }

        self.event_repo
            .append(&AppendSubscriptionEventInput {
                subscription_id: current.id,
                event_type: "cancelled".to_string(),
                previous_status: Some(SubscriptionStatus::Active),
                new_status: Some(SubscriptionStatus::Cancelling),
                metadata: serde_json::json!({"expiry_date": expiry}),
            })
            .await?;

        tracing::info!(host_id = %host_id, subscription_id = %current.id, expiry = %expiry, "Premium subscription cancelled");
        Ok(cancelled)
    }

    /// Transition history for a subscription.
    pub async fn events(&self, subscription_id: Uuid) -> AppResult<Vec<SubscriptionEvent>> {
        self.event_repo.list_by_subscription(subscription_id).await
    }
}
