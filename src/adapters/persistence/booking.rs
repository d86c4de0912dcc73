use async_trait::async_trait;
use sqlx::Row;
use uuid::Uuid;

use crate::{
    adapters::persistence::PostgresPersistence,
    app_error::{AppError, AppResult},
    application::use_cases::revenue::BookingRepo,
    domain::entities::booking::{Booking, Pricing},
};

/// Ingestion boundary for booking records. Defaulting happens here, once:
/// a missing or zero guest count becomes 1, missing pricing subfields
/// become 0. Everything downstream can rely on well-formed rows.
fn row_to_booking(row: &sqlx::postgres::PgRow) -> Booking {
    Booking {
        id: row.get("id"),
        host_id: row.get("host_id"),
        property_id: row.get("property_id"),
        status: row.get("status"),
        number_of_guests: Booking::normalize_guests(row.get::<Option<i32>, _>("number_of_guests")),
        created_at: row.get("created_at"),
        pricing: Pricing {
            total_cents: row
                .get::<Option<i64>, _>("pricing_total_cents")
                .unwrap_or(0),
            service_fee_cents: row
                .get::<Option<i64>, _>("pricing_service_fee_cents")
                .unwrap_or(0),
            guest_fee_cents: row
                .get::<Option<i64>, _>("pricing_guest_fee_cents")
                .unwrap_or(0),
        },
    }
}

const SELECT_COLS: &str = r#"
    id, host_id, property_id, status, number_of_guests, created_at,
    pricing_total_cents, pricing_service_fee_cents, pricing_guest_fee_cents
"#;

#[async_trait]
impl BookingRepo for PostgresPersistence {
    async fn list_by_host(&self, host_id: Uuid) -> AppResult<Vec<Booking>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM bookings WHERE host_id = $1 ORDER BY created_at DESC",
            SELECT_COLS
        ))
        .bind(host_id)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::from)?;
        Ok(rows.iter().map(row_to_booking).collect())
    }
}
