//! Revenue routes: report payload, CSV export, chart series.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::header,
    response::IntoResponse,
    routing::get,
};
use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    adapters::http::app_state::AppState,
    app_error::{AppError, AppResult},
    application::revenue::report::{ReportFilter, TypeFilter},
    domain::entities::{booking::BookingStatus, revenue::TransactionType},
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/hosts/{host_id}/revenue/report", get(get_report))
        .route("/hosts/{host_id}/revenue/report/export", get(export_report))
        .route("/hosts/{host_id}/revenue/charts", get(get_charts))
}

#[derive(Debug, Deserialize)]
struct ReportQuery {
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
    #[serde(rename = "type")]
    tx_type: Option<String>,
    status: Option<String>,
}

impl ReportQuery {
    fn into_filter(self) -> AppResult<ReportFilter> {
        let tx_type = match self.tx_type.as_deref() {
            None | Some("all") => TypeFilter::All,
            Some(raw) => TypeFilter::Only(raw.parse::<TransactionType>().map_err(|_| {
                AppError::Validation(format!("Unknown transaction type '{raw}'"))
            })?),
        };
        let booking_status = self
            .status
            .as_deref()
            .map(|raw| {
                raw.parse::<BookingStatus>()
                    .map_err(|_| AppError::Validation(format!("Unknown booking status '{raw}'")))
            })
            .transpose()?;

        Ok(ReportFilter {
            start_date: self.start_date,
            end_date: self.end_date,
            tx_type,
            booking_status,
        })
    }
}

/// GET /api/hosts/{host_id}/revenue/report
async fn get_report(
    State(app_state): State<AppState>,
    Path(host_id): Path<Uuid>,
    Query(query): Query<ReportQuery>,
) -> AppResult<impl IntoResponse> {
    let filter = query.into_filter()?;
    let report = app_state
        .revenue_use_cases
        .generate_report(host_id, filter)
        .await?;
    Ok(Json(report))
}

/// GET /api/hosts/{host_id}/revenue/report/export
async fn export_report(
    State(app_state): State<AppState>,
    Path(host_id): Path<Uuid>,
    Query(query): Query<ReportQuery>,
) -> AppResult<impl IntoResponse> {
    let filter = query.into_filter()?;
    let csv = app_state
        .revenue_use_cases
        .export_csv(host_id, filter)
        .await?;
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"revenue.csv\"",
            ),
        ],
        csv,
    ))
}

/// GET /api/hosts/{host_id}/revenue/charts
async fn get_charts(
    State(app_state): State<AppState>,
    Path(host_id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let charts = app_state.revenue_use_cases.chart_series(host_id).await?;
    Ok(Json(charts))
}
