use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::Row;
use uuid::Uuid;

use crate::{
    adapters::persistence::PostgresPersistence,
    app_error::{AppError, AppResult},
    application::use_cases::subscription::SubscriptionRepo,
    domain::entities::{
        plan::PlanId,
        subscription::{Subscription, SubscriptionStatus},
    },
};

fn row_to_subscription(row: &sqlx::postgres::PgRow) -> Subscription {
    Subscription {
        id: row.get("id"),
        host_id: row.get("host_id"),
        plan: row.get("plan"),
        price_cents: row.get("price_cents"),
        status: row.get("status"),
        start_date: row.get("start_date"),
        next_billing_date: row.get("next_billing_date"),
        expiry_date: row.get("expiry_date"),
        last_payment_date: row.get("last_payment_date"),
        provider_subscription_ref: row.get("provider_subscription_ref"),
        created_at: row.get("created_at"),
    }
}

const SELECT_COLS: &str = r#"
    id, host_id, plan, price_cents, status, start_date, next_billing_date,
    expiry_date, last_payment_date, provider_subscription_ref, created_at
"#;

#[async_trait]
impl SubscriptionRepo for PostgresPersistence {
    async fn get_current_by_host(&self, host_id: Uuid) -> AppResult<Option<Subscription>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM host_subscriptions WHERE host_id = $1 AND status != $2 ORDER BY created_at DESC LIMIT 1",
            SELECT_COLS
        ))
        .bind(host_id)
        .bind(SubscriptionStatus::Expired)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from)?;
        Ok(row.as_ref().map(row_to_subscription))
    }

    async fn list_by_host(&self, host_id: Uuid) -> AppResult<Vec<Subscription>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM host_subscriptions WHERE host_id = $1 ORDER BY created_at DESC",
            SELECT_COLS
        ))
        .bind(host_id)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::from)?;
        Ok(rows.iter().map(row_to_subscription).collect())
    }

    async fn insert(&self, subscription: &Subscription) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO host_subscriptions
                (id, host_id, plan, price_cents, status, start_date, next_billing_date,
                 expiry_date, last_payment_date, provider_subscription_ref, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, COALESCE($11, now()))
            "#,
        )
        .bind(subscription.id)
        .bind(subscription.host_id)
        .bind(subscription.plan)
        .bind(subscription.price_cents)
        .bind(subscription.status)
        .bind(subscription.start_date)
        .bind(subscription.next_billing_date)
        .bind(subscription.expiry_date)
        .bind(subscription.last_payment_date)
        .bind(&subscription.provider_subscription_ref)
        .bind(subscription.created_at)
        .execute(&self.pool)
        .await
        .map_err(AppError::from)?;
        Ok(())
    }

    async fn mark_expired_if_cancelling(&self, id: Uuid) -> AppResult<bool> {
        // Status-guarded so concurrent lazy-expiry reads collapse into a
        // single effective write.
        let result = sqlx::query(
            r#"
            UPDATE host_subscriptions
            SET status = $2, plan = $3, price_cents = 0, next_billing_date = NULL
            WHERE id = $1 AND status = $4
            "#,
        )
        .bind(id)
        .bind(SubscriptionStatus::Expired)
        .bind(PlanId::Standard)
        .bind(SubscriptionStatus::Cancelling)
        .execute(&self.pool)
        .await
        .map_err(AppError::from)?;
        Ok(result.rows_affected() > 0)
    }

    async fn mark_cancelling_if_active(
        &self,
        id: Uuid,
        expiry_date: DateTime<Utc>,
    ) -> AppResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE host_subscriptions
            SET status = $2, expiry_date = $3
            WHERE id = $1 AND status = $4 AND plan = $5
            "#,
        )
        .bind(id)
        .bind(SubscriptionStatus::Cancelling)
        .bind(expiry_date)
        .bind(SubscriptionStatus::Active)
        .bind(PlanId::Premium)
        .execute(&self.pool)
        .await
        .map_err(AppError::from)?;
        Ok(result.rows_affected() > 0)
    }
}
