use async_trait::async_trait;
use sqlx::Row;
use uuid::Uuid;

use crate::{
    adapters::persistence::PostgresPersistence,
    app_error::{AppError, AppResult},
    application::use_cases::subscription::{AppendSubscriptionEventInput, SubscriptionEventRepo},
    domain::entities::subscription_event::SubscriptionEvent,
};

fn row_to_event(row: &sqlx::postgres::PgRow) -> SubscriptionEvent {
    SubscriptionEvent {
        id: row.get("id"),
        subscription_id: row.get("subscription_id"),
        event_type: row.get("event_type"),
        previous_status: row.get("previous_status"),
        new_status: row.get("new_status"),
        metadata: row.get("metadata"),
        created_at: row.get("created_at"),
    }
}

const SELECT_COLS: &str = r#"
    id, subscription_id, event_type, previous_status, new_status, metadata, created_at
"#;

#[async_trait]
impl SubscriptionEventRepo for PostgresPersistence {
    async fn append(&self, input: &AppendSubscriptionEventInput) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO subscription_events
                (id, subscription_id, event_type, previous_status, new_status, metadata)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(input.subscription_id)
        .bind(&input.event_type)
        .bind(input.previous_status)
        .bind(input.new_status)
        .bind(&input.metadata)
        .execute(&self.pool)
        .await
        .map_err(AppError::from)?;
        Ok(())
    }

    async fn list_by_subscription(
        &self,
        subscription_id: Uuid,
    ) -> AppResult<Vec<SubscriptionEvent>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM subscription_events WHERE subscription_id = $1 ORDER BY created_at DESC",
            SELECT_COLS
        ))
        .bind(subscription_id)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::from)?;
        Ok(rows.iter().map(row_to_event).collect())
    }
}
