//! Test data factories for creating valid test fixtures.
//!
//! Each factory creates a complete, valid object with sensible defaults.
//! Use the closure parameter to override specific fields as needed.

use chrono::{DateTime, Duration, TimeZone, Utc};
use uuid::Uuid;

use crate::domain::entities::{
    booking::{Booking, BookingStatus, Pricing},
    plan::PlanId,
    promo::{DiscountType, PromoCode},
    subscription::{Subscription, SubscriptionStatus},
};

/// Fixed reference instant so fixtures are deterministic.
pub fn test_datetime() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
}

pub fn test_datetime_offset_days(days: i64) -> DateTime<Utc> {
    test_datetime() + Duration::days(days)
}

/// Create a confirmed test booking with sensible defaults.
pub fn create_test_booking(host_id: Uuid, overrides: impl FnOnce(&mut Booking)) -> Booking {
    let mut booking = Booking {
        id: Uuid::new_v4(),
        host_id,
        property_id: Uuid::new_v4(),
        status: BookingStatus::Confirmed,
        number_of_guests: 2,
        created_at: test_datetime(),
        pricing: Pricing {
            total_cents: 10_000,
            service_fee_cents: 800,
            guest_fee_cents: 200,
        },
    };
    overrides(&mut booking);
    booking
}

/// Create an active premium test subscription with sensible defaults.
pub fn create_test_subscription(
    host_id: Uuid,
    overrides: impl FnOnce(&mut Subscription),
) -> Subscription {
    let mut subscription = Subscription {
        id: Uuid::new_v4(),
        host_id,
        plan: PlanId::Premium,
        price_cents: 2900,
        status: SubscriptionStatus::Active,
        start_date: test_datetime(),
        next_billing_date: Some(test_datetime_offset_days(30)),
        expiry_date: None,
        last_payment_date: Some(test_datetime()),
        provider_subscription_ref: Some(format!("I-TEST{}", Uuid::new_v4().simple())),
        created_at: Some(test_datetime()),
    };
    overrides(&mut subscription);
    subscription
}

/// Create an active percentage promo code with sensible defaults.
pub fn create_test_promo(overrides: impl FnOnce(&mut PromoCode)) -> PromoCode {
    let mut promo = PromoCode {
        id: Uuid::new_v4(),
        code: "TESTCODE".to_string(),
        discount_type: DiscountType::Percentage,
        value: 10,
        max_discount_cents: None,
        min_purchase_cents: 0,
        usage_limit: None,
        usage_count: 0,
        usage_per_user: None,
        valid_from: None,
        valid_until: None,
        is_active: true,
        created_at: test_datetime() - Duration::days(30),
    };
    overrides(&mut promo);
    promo
}
