//! Provider-agnostic types for the payment-provider boundary. The checkout
//! and authorization flow lives with the provider; only the post-approval
//! state transition crosses into this core.

use serde::{Deserialize, Serialize};

/// Unique identifier for a subscription in the payment provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProviderSubscriptionId(pub String);

impl ProviderSubscriptionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ProviderSubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for the provider-side order that funded the
/// subscription.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProviderOrderId(pub String);

impl ProviderOrderId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ProviderOrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Payload of a successful provider subscription approval. Receipt of this
/// event is what moves a host from Standard to Premium.
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderApproval {
    pub provider_subscription_id: ProviderSubscriptionId,
    pub provider_order_id: ProviderOrderId,
    /// The provider-side plan this approval is for; must resolve to the
    /// configured premium plan.
    pub plan_reference: String,
}
