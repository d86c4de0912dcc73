use async_trait::async_trait;
use sqlx::Row;
use uuid::Uuid;

use crate::{
    adapters::persistence::PostgresPersistence,
    app_error::{AppError, AppResult},
    application::use_cases::promo::PromoRepo,
    domain::entities::promo::PromoCode,
};

fn row_to_promo(row: &sqlx::postgres::PgRow) -> PromoCode {
    PromoCode {
        id: row.get("id"),
        code: row.get("code"),
        discount_type: row.get("discount_type"),
        value: row.get("value"),
        max_discount_cents: row.get("max_discount_cents"),
        min_purchase_cents: row.get("min_purchase_cents"),
        usage_limit: row.get("usage_limit"),
        usage_count: row.get("usage_count"),
        usage_per_user: row.get("usage_per_user"),
        valid_from: row.get("valid_from"),
        valid_until: row.get("valid_until"),
        is_active: row.get("is_active"),
        created_at: row.get("created_at"),
    }
}

const SELECT_COLS: &str = r#"
    id, code, discount_type, value, max_discount_cents, min_purchase_cents,
    usage_limit, usage_count, usage_per_user, valid_from, valid_until,
    is_active, created_at
"#;

#[async_trait]
impl PromoRepo for PostgresPersistence {
    async fn get_by_code(&self, code: &str) -> AppResult<Option<PromoCode>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM promo_codes WHERE code = $1",
            SELECT_COLS
        ))
        .bind(code)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from)?;
        Ok(row.as_ref().map(row_to_promo))
    }

    async fn user_usage_count(&self, promo_id: Uuid, user_id: Uuid) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM promo_redemptions WHERE promo_id = $1 AND user_id = $2",
        )
        .bind(promo_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::from)?;
        Ok(count)
    }

    async fn record_usage(&self, promo_id: Uuid, user_id: Uuid) -> AppResult<()> {
        let mut tx = self.pool.begin().await.map_err(AppError::from)?;
        sqlx::query("UPDATE promo_codes SET usage_count = usage_count + 1 WHERE id = $1")
            .bind(promo_id)
            .execute(&mut *tx)
            .await
            .map_err(AppError::from)?;
        sqlx::query(
            "INSERT INTO promo_redemptions (id, promo_id, user_id) VALUES ($1, $2, $3)",
        )
        .bind(Uuid::new_v4())
        .bind(promo_id)
        .bind(user_id)
        .execute(&mut *tx)
        .await
        .map_err(AppError::from)?;
        tx.commit().await.map_err(AppError::from)?;
        Ok(())
    }
}
