use async_trait::async_trait;
use sqlx::Row;

use crate::{
    adapters::persistence::PostgresPersistence,
    app_error::{AppError, AppResult},
    application::use_cases::policy::PolicyRepo,
    domain::entities::policy::Policy,
};

fn row_to_policy(row: &sqlx::postgres::PgRow) -> Policy {
    Policy {
        service_fee_cents: row.get("service_fee_cents"),
        guest_fee_per_person_cents: row.get("guest_fee_per_person_cents"),
        wallet_withdrawal_fee_pct: row.get("wallet_withdrawal_fee_pct"),
        cancellation_window_hours: row.get("cancellation_window_hours"),
        min_property_rating: row.get("min_property_rating"),
        cleaning_fee_cents: row.get("cleaning_fee_cents"),
        service_fee_per_property_cents: row.get("service_fee_per_property_cents"),
        updated_at: row.get("updated_at"),
    }
}

#[async_trait]
impl PolicyRepo for PostgresPersistence {
    async fn get(&self) -> AppResult<Option<Policy>> {
        let row = sqlx::query(
            r#"
            SELECT service_fee_cents, guest_fee_per_person_cents, wallet_withdrawal_fee_pct,
                   cancellation_window_hours, min_property_rating, cleaning_fee_cents,
                   service_fee_per_property_cents, updated_at
            FROM platform_policy WHERE singleton = TRUE
            "#,
        )
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from)?;
        Ok(row.as_ref().map(row_to_policy))
    }

    async fn upsert(&self, policy: &Policy) -> AppResult<Policy> {
        let row = sqlx::query(
            r#"
            INSERT INTO platform_policy
                (singleton, service_fee_cents, guest_fee_per_person_cents, wallet_withdrawal_fee_pct,
                 cancellation_window_hours, min_property_rating, cleaning_fee_cents,
                 service_fee_per_property_cents, updated_at)
            VALUES (TRUE, $1, $2, $3, $4, $5, $6, $7, now())
            ON CONFLICT (singleton) DO UPDATE SET
                service_fee_cents = EXCLUDED.service_fee_cents,
                guest_fee_per_person_cents = EXCLUDED.guest_fee_per_person_cents,
                wallet_withdrawal_fee_pct = EXCLUDED.wallet_withdrawal_fee_pct,
                cancellation_window_hours = EXCLUDED.cancellation_window_hours,
                min_property_rating = EXCLUDED.min_property_rating,
                cleaning_fee_cents = EXCLUDED.cleaning_fee_cents,
                service_fee_per_property_cents = EXCLUDED.service_fee_per_property_cents,
                updated_at = now()
            RETURNING service_fee_cents, guest_fee_per_person_cents, wallet_withdrawal_fee_pct,
                      cancellation_window_hours, min_property_rating, cleaning_fee_cents,
                      service_fee_per_property_cents, updated_at
            "#,
        )
        .bind(policy.service_fee_cents)
        .bind(policy.guest_fee_per_person_cents)
        .bind(policy.wallet_withdrawal_fee_pct)
        .bind(policy.cancellation_window_hours)
        .bind(policy.min_property_rating)
        .bind(policy.cleaning_fee_cents)
        .bind(policy.service_fee_per_property_cents)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::from)?;
        Ok(row_to_policy(&row))
    }
}
