use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Classification of a derived monetary event.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::AsRefStr,
    strum::Display,
    strum::EnumString,
)]
#[strum(ascii_case_insensitive)]
pub enum TransactionType {
    Booking,
    ServiceFee,
    GuestFee,
    Subscription,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Booking => "Booking",
            TransactionType::ServiceFee => "ServiceFee",
            TransactionType::GuestFee => "GuestFee",
            TransactionType::Subscription => "Subscription",
        }
    }
}

/// A single derived revenue event. Never persisted; rebuilt from booking and
/// subscription snapshots on every report request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevenueTransaction {
    pub date: DateTime<Utc>,
    pub tx_type: TransactionType,
    pub amount_cents: i64,
    pub reference_id: Uuid,
    pub label: String,
}
