//! In-memory mock implementations for the repository traits.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Mutex;
use uuid::Uuid;

use crate::{
    app_error::{AppError, AppResult},
    application::use_cases::{
        policy::PolicyRepo,
        promo::PromoRepo,
        revenue::BookingRepo,
        subscription::{
            AppendSubscriptionEventInput, SubscriptionEventRepo, SubscriptionRepo,
        },
    },
    domain::entities::{
        booking::Booking,
        plan::PlanId,
        policy::Policy,
        promo::PromoCode,
        subscription::{Subscription, SubscriptionStatus},
        subscription_event::SubscriptionEvent,
    },
};

// ============================================================================
// InMemorySubscriptionRepo
// ============================================================================

#[derive(Default)]
pub struct InMemorySubscriptionRepo {
    pub subscriptions: Mutex<Vec<Subscription>>,
}

impl InMemorySubscriptionRepo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed(&self, subscription: Subscription) {
        self.subscriptions.lock().unwrap().push(subscription);
    }

    pub fn count(&self) -> usize {
        self.subscriptions.lock().unwrap().len()
    }
}

#[async_trait]
impl SubscriptionRepo for InMemorySubscriptionRepo {
    async fn get_current_by_host(&self, host_id: Uuid) -> AppResult<Option<Subscription>> {
        let subs = self.subscriptions.lock().unwrap();
        Ok(subs
            .iter()
            .filter(|s| s.host_id == host_id && s.status != SubscriptionStatus::Expired)
            .max_by_key(|s| s.created_at.unwrap_or(s.start_date))
            .cloned())
    }

    async fn list_by_host(&self, host_id: Uuid) -> AppResult<Vec<Subscription>> {
        let subs = self.subscriptions.lock().unwrap();
        Ok(subs.iter().filter(|s| s.host_id == host_id).cloned().collect())
    }

    async fn insert(&self, subscription: &Subscription) -> AppResult<()> {
        self.subscriptions.lock().unwrap().push(subscription.clone());
        Ok(())
    }

    async fn mark_expired_if_cancelling(&self, id: Uuid) -> AppResult<bool> {
        let mut subs = self.subscriptions.lock().unwrap();
        match subs
            .iter_mut()
            .find(|s| s.id == id && s.status == SubscriptionStatus::Cancelling)
        {
            Some(sub) => {
                sub.status = SubscriptionStatus::Expired;
                sub.plan = PlanId::Standard;
                sub.price_cents = 0;
                sub.next_billing_date = None;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn mark_cancelling_if_active(
        &self,
        id: Uuid,
        expiry_date: DateTime<Utc>,
    ) -> AppResult<bool> {
        let mut subs = self.subscriptions.lock().unwrap();
        match subs.iter_mut().find(|s| {
            s.id == id && s.status == SubscriptionStatus::Active && s.plan == PlanId::Premium
        }) {
            Some(sub) => {
                sub.status = SubscriptionStatus::Cancelling;
                sub.expiry_date = Some(expiry_date);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

// ============================================================================
// InMemorySubscriptionEventRepo
// ============================================================================

#[derive(Default)]
pub struct InMemorySubscriptionEventRepo {
    pub events: Mutex<Vec<SubscriptionEvent>>,
}

impl InMemorySubscriptionEventRepo {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SubscriptionEventRepo for InMemorySubscriptionEventRepo {
    async fn append(&self, input: &AppendSubscriptionEventInput) -> AppResult<()> {
        self.events.lock().unwrap().push(SubscriptionEvent {
            id: Uuid::new_v4(),
            subscription_id: input.subscription_id,
            event_type: input.event_type.clone(),
            previous_status: input.previous_status,
            new_status: input.new_status,
            metadata: input.metadata.clone(),
            created_at: Utc::now(),
        });
        Ok(())
    }

    async fn list_by_subscription(
        &self,
        subscription_id: Uuid,
    ) -> AppResult<Vec<SubscriptionEvent>> {
        Ok(self
            .events
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.subscription_id == subscription_id)
            .cloned()
            .collect())
    }
}

// ============================================================================
// InMemoryBookingRepo
// ============================================================================

#[derive(Default)]
pub struct InMemoryBookingRepo {
    pub bookings: Mutex<Vec<Booking>>,
}

impl InMemoryBookingRepo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed(&self, booking: Booking) {
        self.bookings.lock().unwrap().push(booking);
    }
}

#[async_trait]
impl BookingRepo for InMemoryBookingRepo {
    async fn list_by_host(&self, host_id: Uuid) -> AppResult<Vec<Booking>> {
        Ok(self
            .bookings
            .lock()
            .unwrap()
            .iter()
            .filter(|b| b.host_id == host_id)
            .cloned()
            .collect())
    }
}

/// Booking source that always fails, for degraded-read tests.
#[derive(Default)]
pub struct FailingBookingRepo;

#[async_trait]
impl BookingRepo for FailingBookingRepo {
    async fn list_by_host(&self, _host_id: Uuid) -> AppResult<Vec<Booking>> {
        Err(AppError::Database("booking source unavailable".into()))
    }
}

// ============================================================================
// InMemoryPolicyRepo
// ============================================================================

/// Starts empty: `get` returns `None` until an upsert, mirroring a fresh
/// platform where the defaults apply.
#[derive(Default)]
pub struct InMemoryPolicyRepo {
    pub policy: Mutex<Option<Policy>>,
}

impl InMemoryPolicyRepo {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PolicyRepo for InMemoryPolicyRepo {
    async fn get(&self) -> AppResult<Option<Policy>> {
        Ok(self.policy.lock().unwrap().clone())
    }

    async fn upsert(&self, policy: &Policy) -> AppResult<Policy> {
        *self.policy.lock().unwrap() = Some(policy.clone());
        Ok(policy.clone())
    }
}

// ============================================================================
// InMemoryPromoRepo
// ============================================================================

#[derive(Default)]
pub struct InMemoryPromoRepo {
    pub promos: Mutex<HashMap<String, PromoCode>>,
    pub redemptions: Mutex<Vec<(Uuid, Uuid)>>,
}

impl InMemoryPromoRepo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed(&self, promo: PromoCode) {
        self.promos.lock().unwrap().insert(promo.code.clone(), promo);
    }
}

#[async_trait]
impl PromoRepo for InMemoryPromoRepo {
    async fn get_by_code(&self, code: &str) -> AppResult<Option<PromoCode>> {
        Ok(self.promos.lock().unwrap().get(code).cloned())
    }

    async fn user_usage_count(&self, promo_id: Uuid, user_id: Uuid) -> AppResult<i64> {
        Ok(self
            .redemptions
            .lock()
            .unwrap()
            .iter()
            .filter(|(p, u)| *p == promo_id && *u == user_id)
            .count() as i64)
    }

    async fn record_usage(&self, promo_id: Uuid, user_id: Uuid) -> AppResult<()> {
        self.redemptions.lock().unwrap().push((promo_id, user_id));
        let mut promos = self.promos.lock().unwrap();
        if let Some(promo) = promos.values_mut().find(|p| p.id == promo_id) {
            promo.usage_count += 1;
        }
        Ok(())
    }
}
