use async_trait::async_trait;
use chrono::Utc;
use serde::Deserialize;
use std::sync::Arc;

use crate::{
    app_error::{AppError, AppResult},
    domain::entities::policy::Policy,
};

#[async_trait]
pub trait PolicyRepo: Send + Sync {
    /// The singleton policy row, if one has been written.
    async fn get(&self) -> AppResult<Option<Policy>>;
    /// Replace the singleton row. Last write wins; the admin path is the
    /// only writer.
    async fn upsert(&self, policy: &Policy) -> AppResult<Policy>;
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdatePolicyInput {
    pub service_fee_cents: i64,
    pub guest_fee_per_person_cents: i64,
    pub wallet_withdrawal_fee_pct: f64,
    pub cancellation_window_hours: i64,
    pub min_property_rating: f64,
    pub cleaning_fee_cents: i64,
    pub service_fee_per_property_cents: i64,
}

#[derive(Clone)]
pub struct PolicyUseCases {
    policy_repo: Arc<dyn PolicyRepo>,
}

impl PolicyUseCases {
    pub fn new(policy_repo: Arc<dyn PolicyRepo>) -> Self {
        Self { policy_repo }
    }

    /// Current platform policy; defaults apply until an admin writes one.
    pub async fn get(&self) -> AppResult<Policy> {
        Ok(self.policy_repo.get().await?.unwrap_or_default())
    }

    /// Admin update. The invariants are checked before anything is written.
    pub async fn update(&self, input: UpdatePolicyInput) -> AppResult<Policy> {
        let policy = Policy {
            service_fee_cents: input.service_fee_cents,
            guest_fee_per_person_cents: input.guest_fee_per_person_cents,
            wallet_withdrawal_fee_pct: input.wallet_withdrawal_fee_pct,
            cancellation_window_hours: input.cancellation_window_hours,
            min_property_rating: input.min_property_rating,
            cleaning_fee_cents: input.cleaning_fee_cents,
            service_fee_per_property_cents: input.service_fee_per_property_cents,
            updated_at: Some(Utc::now()),
        };
        policy.validate().map_err(AppError::Validation)?;

        let saved = self.policy_repo.upsert(&policy).await?;
        tracing::info!("Platform policy updated");
        Ok(saved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::InMemoryPolicyRepo;

    fn input() -> UpdatePolicyInput {
        UpdatePolicyInput {
            service_fee_cents: 900,
            guest_fee_per_person_cents: 150,
            wallet_withdrawal_fee_pct: 3.0,
            cancellation_window_hours: 24,
            min_property_rating: 3.5,
            cleaning_fee_cents: 2000,
            service_fee_per_property_cents: 600,
        }
    }

    #[tokio::test]
    async fn test_get_falls_back_to_defaults() {
        let uc = PolicyUseCases::new(Arc::new(InMemoryPolicyRepo::new()));
        let policy = uc.get().await.unwrap();
        assert_eq!(policy, Policy::default());
    }

    #[tokio::test]
    async fn test_update_persists_and_reads_back() {
        let uc = PolicyUseCases::new(Arc::new(InMemoryPolicyRepo::new()));
        let saved = uc.update(input()).await.unwrap();
        assert_eq!(saved.service_fee_cents, 900);

        let read = uc.get().await.unwrap();
        assert_eq!(read.service_fee_cents, 900);
        assert_eq!(read.guest_fee_per_person_cents, 150);
    }

    #[tokio::test]
    async fn test_invalid_update_rejected_without_write() {
        let repo = Arc::new(InMemoryPolicyRepo::new());
        let uc = PolicyUseCases::new(repo.clone());

        let mut bad = input();
        bad.wallet_withdrawal_fee_pct = 150.0;
        let err = uc.update(bad).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        // The singleton is still unwritten.
        assert_eq!(uc.get().await.unwrap(), Policy::default());
    }
}
