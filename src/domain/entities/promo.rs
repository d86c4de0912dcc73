use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    sqlx::Type,
    strum::AsRefStr,
    strum::Display,
    strum::EnumString,
)]
#[sqlx(type_name = "discount_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum DiscountType {
    /// `value` is a percentage of the subtotal, in (0, 100].
    Percentage,
    /// `value` is a fixed amount in cents.
    Fixed,
}

/// A promotional code. Only the validation math lives in this core; the
/// authoring wizard is the dashboard's concern.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromoCode {
    pub id: Uuid,
    pub code: String,
    pub discount_type: DiscountType,
    /// Percentage points for `Percentage`, cents for `Fixed`.
    pub value: i64,
    pub max_discount_cents: Option<i64>,
    pub min_purchase_cents: i64,
    /// Total redemptions allowed; 0 or absent means unlimited.
    pub usage_limit: Option<i64>,
    pub usage_count: i64,
    pub usage_per_user: Option<i64>,
    pub valid_from: Option<DateTime<Utc>>,
    pub valid_until: Option<DateTime<Utc>>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl PromoCode {
    /// Whether the code can still be redeemed at all (active, inside its
    /// validity window, global usage not exhausted).
    pub fn is_redeemable(&self, now: DateTime<Utc>) -> bool {
        if !self.is_active {
            return false;
        }
        if self.valid_from.is_some_and(|from| now < from) {
            return false;
        }
        if self.valid_until.is_some_and(|until| now > until) {
            return false;
        }
        match self.usage_limit {
            Some(limit) if limit > 0 => self.usage_count < limit,
            _ => true,
        }
    }
}
