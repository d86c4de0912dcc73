//! Pure fee computations over `(Policy, Booking)`. No side effects, no I/O.

use chrono::{DateTime, Utc};

use crate::{
    app_error::{AppError, AppResult},
    domain::entities::{
        booking::Booking,
        policy::Policy,
        promo::{DiscountType, PromoCode},
    },
};

/// Flat per-booking service fee. Currently booking-independent.
pub fn service_fee(policy: &Policy) -> i64 {
    policy.service_fee_cents
}

/// Per-guest fee. A guest count below one is billed as a single guest, so a
/// booking never produces a zero guest fee.
pub fn guest_fee(policy: &Policy, booking: &Booking) -> i64 {
    policy.guest_fee_per_person_cents * i64::from(booking.number_of_guests.max(1))
}

/// Fee withheld from a wallet withdrawal.
///
/// Accumulates in f64 only for the percentage step and rounds once at the
/// end (round half away from zero), matching how other monetary percentages
/// are settled in this crate.
pub fn withdrawal_fee(policy: &Policy, amount_cents: i64) -> i64 {
    (amount_cents as f64 * policy.wallet_withdrawal_fee_pct / 100.0).round() as i64
}

/// Compute the discount a promo code yields on a subtotal, rejecting the
/// redemption when the code is not applicable.
///
/// The returned discount is non-negative and never exceeds the subtotal.
pub fn promo_discount(
    promo: &PromoCode,
    subtotal_cents: i64,
    user_usage_count: i64,
    now: DateTime<Utc>,
) -> AppResult<i64> {
    if !promo.is_redeemable(now) {
        return Err(AppError::Validation(format!(
            "Promo code '{}' is not currently redeemable",
            promo.code
        )));
    }
    if subtotal_cents < promo.min_purchase_cents {
        return Err(AppError::Validation(format!(
            "Subtotal is below the minimum purchase for promo code '{}'",
            promo.code
        )));
    }
    if let Some(per_user) = promo.usage_per_user
        && per_user > 0
        && user_usage_count >= per_user
    {
        return Err(AppError::Validation(format!(
            "Promo code '{}' has already been used the maximum number of times",
            promo.code
        )));
    }

    let discount = match promo.discount_type {
        DiscountType::Percentage => {
            if promo.value <= 0 || promo.value > 100 {
                return Err(AppError::Validation(format!(
                    "Promo code '{}' has an invalid percentage value",
                    promo.code
                )));
            }
            let raw = (subtotal_cents as f64 * promo.value as f64 / 100.0).round() as i64;
            match promo.max_discount_cents {
                Some(cap) => raw.min(cap),
                None => raw,
            }
        }
        DiscountType::Fixed => promo.value.min(subtotal_cents),
    };

    Ok(discount.clamp(0, subtotal_cents))
}
