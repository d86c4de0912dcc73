use chrono::{DateTime, Duration, Months, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::plan::PlanId;

/// Days after account creation during which a Standard host counts as being
/// on a free trial. Informational only, grants no extra entitlement.
pub const FREE_TRIAL_DAYS: i64 = 14;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    sqlx::Type,
    strum::AsRefStr,
    strum::Display,
    strum::EnumString,
)]
#[sqlx(type_name = "subscription_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum SubscriptionStatus {
    Active,
    Cancelling,
    Expired,
    Pending,
}

impl SubscriptionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionStatus::Active => "active",
            SubscriptionStatus::Cancelling => "cancelling",
            SubscriptionStatus::Expired => "expired",
            SubscriptionStatus::Pending => "pending",
        }
    }
}

/// One subscription episode for a host. Never hard-deleted; a record only
/// moves forward through status transitions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subscription {
    pub id: Uuid,
    pub host_id: Uuid,
    pub plan: PlanId,
    pub price_cents: i64,
    pub status: SubscriptionStatus,
    pub start_date: DateTime<Utc>,
    pub next_billing_date: Option<DateTime<Utc>>,
    /// Set only while cancelling; entitlement survives until this moment.
    pub expiry_date: Option<DateTime<Utc>>,
    pub last_payment_date: Option<DateTime<Utc>>,
    pub provider_subscription_ref: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

/// Outcome of resolving a host's current subscription.
#[derive(Debug, Clone)]
pub struct Resolution {
    pub subscription: Subscription,
    /// Set when the record did not exist and a default was materialized.
    /// Persisting it is the caller's explicit, separate write.
    pub created_default: bool,
    /// Set when the lazy expiry transition fired during this read. The
    /// caller must persist it with a status-guarded update so concurrent
    /// resolutions collapse into one write.
    pub expired: bool,
}

impl Subscription {
    /// The implicit free record for a host with no subscription history.
    pub fn standard_default(host_id: Uuid, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            host_id,
            plan: PlanId::Standard,
            price_cents: 0,
            status: SubscriptionStatus::Active,
            start_date: now,
            next_billing_date: None,
            expiry_date: None,
            last_payment_date: None,
            provider_subscription_ref: None,
            created_at: Some(now),
        }
    }

    /// A premium episode created from a provider approval. The caller is
    /// responsible for validating price and provider reference first.
    pub fn premium_active(
        host_id: Uuid,
        price_cents: i64,
        provider_subscription_ref: String,
        now: DateTime<Utc>,
    ) -> Self {
        let next_billing = now.checked_add_months(Months::new(1));
        Self {
            id: Uuid::new_v4(),
            host_id,
            plan: PlanId::Premium,
            price_cents,
            status: SubscriptionStatus::Active,
            start_date: now,
            next_billing_date: next_billing,
            expiry_date: None,
            last_payment_date: Some(now),
            provider_subscription_ref: Some(provider_subscription_ref),
            created_at: Some(now),
        }
    }

    /// Lazy expiry: a cancelling record whose expiry has passed downgrades
    /// to an expired Standard record. Idempotent; any other state is
    /// returned unchanged.
    pub fn tick(mut self, now: DateTime<Utc>) -> (Self, bool) {
        let due = self.status == SubscriptionStatus::Cancelling
            && self.expiry_date.is_some_and(|expiry| now > expiry);
        if due {
            self.status = SubscriptionStatus::Expired;
            self.plan = PlanId::Standard;
            self.price_cents = 0;
            self.next_billing_date = None;
        }
        (self, due)
    }

    /// User-initiated cancellation. Entitlement is not revoked here; the
    /// record keeps Premium until `expiry_date` passes.
    pub fn cancel(mut self, now: DateTime<Utc>) -> Result<Self, String> {
        if self.status != SubscriptionStatus::Active || self.plan != PlanId::Premium {
            return Err(format!(
                "Only an active premium subscription can be cancelled (status: {}, plan: {})",
                self.status, self.plan
            ));
        }
        self.status = SubscriptionStatus::Cancelling;
        self.expiry_date = Some(self.next_billing_date.unwrap_or(now));
        Ok(self)
    }

    /// Whether the host currently holds Premium entitlements. Distinct from
    /// the raw status: a cancelling record stays entitled through its
    /// expiry date.
    pub fn has_premium(&self, now: DateTime<Utc>) -> bool {
        match self.status {
            SubscriptionStatus::Active => self.plan == PlanId::Premium,
            SubscriptionStatus::Cancelling => {
                self.expiry_date.is_some_and(|expiry| now <= expiry)
            }
            _ => false,
        }
    }
}

/// Resolve a host's current subscription from the latest stored record, or
/// materialize the implicit Standard default. Pure: persistence of the
/// default record and of the expiry downgrade are the caller's writes.
pub fn resolve(host_id: Uuid, existing: Option<Subscription>, now: DateTime<Utc>) -> Resolution {
    match existing {
        Some(sub) => {
            let (sub, expired) = sub.tick(now);
            Resolution {
                subscription: sub,
                created_default: false,
                expired,
            }
        }
        None => Resolution {
            subscription: Subscription::standard_default(host_id, now),
            created_default: true,
            expired: false,
        },
    }
}

/// Whether a Standard-plan host is still inside the free-trial window.
pub fn is_free_trial(plan: PlanId, account_created_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    plan == PlanId::Standard && now - account_created_at <= Duration::days(FREE_TRIAL_DAYS)
}
