use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Platform-wide monetary policy. A single row, read by every fee
/// computation and mutated only through the admin update path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Policy {
    /// Flat service fee charged per booking.
    pub service_fee_cents: i64,
    /// Fee charged per guest on a booking.
    pub guest_fee_per_person_cents: i64,
    /// Percentage fee applied to wallet withdrawals, in [0, 100].
    pub wallet_withdrawal_fee_pct: f64,
    /// Hours before check-in during which a guest may cancel.
    pub cancellation_window_hours: i64,
    /// Minimum rating a property must hold to stay listed, in [0, 5].
    pub min_property_rating: f64,
    pub cleaning_fee_cents: i64,
    pub service_fee_per_property_cents: i64,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Default for Policy {
    fn default() -> Self {
        Self {
            service_fee_cents: 800,
            guest_fee_per_person_cents: 100,
            wallet_withdrawal_fee_pct: 2.5,
            cancellation_window_hours: 48,
            min_property_rating: 3.0,
            cleaning_fee_cents: 2500,
            service_fee_per_property_cents: 500,
            updated_at: None,
        }
    }
}

impl Policy {
    /// Check the policy invariants: monetary fields non-negative,
    /// percentages within [0, 100], rating within [0, 5].
    pub fn validate(&self) -> Result<(), String> {
        if self.service_fee_cents < 0
            || self.guest_fee_per_person_cents < 0
            || self.cleaning_fee_cents < 0
            || self.service_fee_per_property_cents < 0
        {
            return Err("Monetary policy fields cannot be negative".into());
        }
        if !(0.0..=100.0).contains(&self.wallet_withdrawal_fee_pct) {
            return Err("Withdrawal fee percentage must be between 0 and 100".into());
        }
        if self.cancellation_window_hours < 0 {
            return Err("Cancellation window cannot be negative".into());
        }
        if !(0.0..=5.0).contains(&self.min_property_rating) {
            return Err("Minimum property rating must be between 0 and 5".into());
        }
        Ok(())
    }
}
