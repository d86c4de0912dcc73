use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

/// Host plan tier. Standard is the free default; Premium is the paid tier.
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
    AsRefStr,
    Display,
    EnumString,
)]
#[sqlx(type_name = "plan_id", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[derive(Default)]
pub enum PlanId {
    #[default]
    Standard,
    Premium,
}

impl PlanId {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlanId::Standard => "standard",
            PlanId::Premium => "premium",
        }
    }

    pub fn is_paid(&self) -> bool {
        matches!(self, PlanId::Premium)
    }
}
