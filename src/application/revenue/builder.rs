//! Expansion of raw booking and subscription snapshots into atomic revenue
//! transaction rows. Pure and idempotent: the same snapshot always yields
//! the same set, so nothing here is ever cached or persisted.

use chrono::{DateTime, Utc};

use crate::{
    application::fees,
    domain::entities::{
        booking::Booking,
        policy::Policy,
        revenue::{RevenueTransaction, TransactionType},
        subscription::Subscription,
    },
};

/// The date a subscription charge is attributed to. Priority order is
/// `created_at`, then `start_date`, then `last_payment_date`; `start_date`
/// is required on our rows so the chain terminates there.
pub fn subscription_revenue_date(sub: &Subscription) -> DateTime<Utc> {
    sub.created_at.unwrap_or(sub.start_date)
}

/// Build the full transaction set for a host's snapshot.
///
/// Each revenue-eligible booking expands into three rows (base amount,
/// service fee, guest fee) sharing the booking's creation date and id. The
/// three are additive, separate flows on top of the nightly rate; their sum
/// is deliberately more than `pricing.total`.
///
/// Subscriptions are included whenever `price_cents > 0`, regardless of
/// status: a charge that happened counts for the date it was charged even
/// if the subscription has since expired. Entitlement checks are stricter
/// on purpose.
pub fn build_transactions(
    policy: &Policy,
    bookings: &[Booking],
    subscriptions: &[Subscription],
) -> Vec<RevenueTransaction> {
    let mut transactions =
        Vec::with_capacity(bookings.len() * 3 + subscriptions.len());

    for booking in bookings.iter().filter(|b| b.is_revenue_eligible()) {
        let short_id = booking.id.simple().to_string();
        let short_id = &short_id[..8];

        transactions.push(RevenueTransaction {
            date: booking.created_at,
            tx_type: TransactionType::Booking,
            amount_cents: booking.pricing.total_cents,
            reference_id: booking.id,
            label: format!("Booking #{short_id}"),
        });
        transactions.push(RevenueTransaction {
            date: booking.created_at,
            tx_type: TransactionType::ServiceFee,
            amount_cents: fees::service_fee(policy),
            reference_id: booking.id,
            label: format!("Service fee for booking #{short_id}"),
        });
        transactions.push(RevenueTransaction {
            date: booking.created_at,
            tx_type: TransactionType::GuestFee,
            amount_cents: fees::guest_fee(policy, booking),
            reference_id: booking.id,
            label: format!(
                "Guest fee for booking #{short_id} ({} guests)",
                booking.number_of_guests.max(1)
            ),
        });
    }

    for sub in subscriptions.iter().filter(|s| s.price_cents > 0) {
        transactions.push(RevenueTransaction {
            date: subscription_revenue_date(sub),
            tx_type: TransactionType::Subscription,
            amount_cents: sub.price_cents,
            reference_id: sub.id,
            label: format!("{} subscription", capitalize(sub.plan.as_str())),
        });
    }

    transactions
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
