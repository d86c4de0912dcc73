use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

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
#[sqlx(type_name = "booking_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Completed,
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Completed => "completed",
            BookingStatus::Cancelled => "cancelled",
        }
    }

    /// Only confirmed and completed bookings contribute revenue.
    pub fn is_revenue_eligible(&self) -> bool {
        matches!(self, BookingStatus::Confirmed | BookingStatus::Completed)
    }
}

/// Monetary breakdown of a booking as recorded by the booking flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Pricing {
    pub total_cents: i64,
    pub service_fee_cents: i64,
    pub guest_fee_cents: i64,
}

/// A booking record, consumed read-only. Created and mutated by the booking
/// subsystem; this core only classifies it into revenue transactions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: Uuid,
    pub host_id: Uuid,
    pub property_id: Uuid,
    pub status: BookingStatus,
    /// Guest count after ingestion defaulting: never below 1.
    pub number_of_guests: i32,
    pub created_at: DateTime<Utc>,
    pub pricing: Pricing,
}

impl Booking {
    pub fn is_revenue_eligible(&self) -> bool {
        self.status.is_revenue_eligible()
    }

    /// Defaulting rule applied once at the ingestion boundary: a missing or
    /// zero guest count is treated as a single guest.
    pub fn normalize_guests(raw: Option<i32>) -> i32 {
        raw.filter(|n| *n >= 1).unwrap_or(1)
    }
}
