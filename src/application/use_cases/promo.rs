use async_trait::async_trait;
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    app_error::{AppError, AppResult},
    application::fees,
    domain::entities::promo::PromoCode,
};

#[async_trait]
pub trait PromoRepo: Send + Sync {
    async fn get_by_code(&self, code: &str) -> AppResult<Option<PromoCode>>;
    /// How many times this user has redeemed the code.
    async fn user_usage_count(&self, promo_id: Uuid, user_id: Uuid) -> AppResult<i64>;
    /// Record a redemption: bumps the global counter and the per-user log.
    async fn record_usage(&self, promo_id: Uuid, user_id: Uuid) -> AppResult<()>;
}

#[derive(Debug, Clone, Serialize)]
pub struct PromoValidation {
    pub code: String,
    pub discount_cents: i64,
    pub subtotal_after_discount_cents: i64,
}

#[derive(Clone)]
pub struct PromoUseCases {
    promo_repo: Arc<dyn PromoRepo>,
}

impl PromoUseCases {
    pub fn new(promo_repo: Arc<dyn PromoRepo>) -> Self {
        Self { promo_repo }
    }

    /// Check a code against a subtotal without consuming a redemption.
    pub async fn validate(
        &self,
        code: &str,
        user_id: Uuid,
        subtotal_cents: i64,
    ) -> AppResult<PromoValidation> {
        let promo = self.lookup(code).await?;
        let usage = self
            .promo_repo
            .user_usage_count(promo.id, user_id)
            .await?;
        let discount = fees::promo_discount(&promo, subtotal_cents, usage, Utc::now())?;
        Ok(PromoValidation {
            code: promo.code,
            discount_cents: discount,
            subtotal_after_discount_cents: subtotal_cents - discount,
        })
    }

    /// Validate and consume a redemption. Usage is only recorded after the
    /// discount computation accepts the code, so a rejection has no effect.
    pub async fn redeem(
        &self,
        code: &str,
        user_id: Uuid,
        subtotal_cents: i64,
    ) -> AppResult<PromoValidation> {
        let promo = self.lookup(code).await?;
        let usage = self
            .promo_repo
            .user_usage_count(promo.id, user_id)
            .await?;
        let discount = fees::promo_discount(&promo, subtotal_cents, usage, Utc::now())?;
        self.promo_repo.record_usage(promo.id, user_id).await?;
        Ok(PromoValidation {
            code: promo.code,
            discount_cents: discount,
            subtotal_after_discount_cents: subtotal_cents - discount,
        })
    }

    async fn lookup(&self, code: &str) -> AppResult<PromoCode> {
        self.promo_repo
            .get_by_code(code)
            .await?
            .ok_or(AppError::NotFound)
    }
}
