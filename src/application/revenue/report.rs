//! Filtering, ordering, bucketing and summarizing of revenue transactions.
//! Everything here is pure; snapshot reads happen in the use case layer.

use chrono::{DateTime, Datelike, Days, Months, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    app_error::{AppError, AppResult},
    domain::entities::{
        booking::BookingStatus,
        revenue::{RevenueTransaction, TransactionType},
    },
};

/// Number of daily buckets in the short-range trend series.
pub const DAILY_WINDOW_DAYS: u64 = 7;
/// Number of monthly buckets in the long-range series.
pub const MONTHLY_WINDOW_MONTHS: u32 = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeFilter {
    #[default]
    All,
    #[serde(untagged)]
    Only(TransactionType),
}

impl TypeFilter {
    fn matches(&self, tx_type: TransactionType) -> bool {
        match self {
            TypeFilter::All => true,
            TypeFilter::Only(t) => *t == tx_type,
        }
    }
}

/// Caller-supplied report constraints. Date bounds are calendar days,
/// inclusive on both ends; the end bound covers its whole day.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct ReportFilter {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub tx_type: TypeFilter,
    pub booking_status: Option<BookingStatus>,
}

impl ReportFilter {
    pub fn validate(&self) -> AppResult<()> {
        if let (Some(start), Some(end)) = (self.start_date, self.end_date)
            && end < start
        {
            return Err(AppError::Validation(
                "end_date cannot be before start_date".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RevenueSummary {
    pub total_revenue_cents: i64,
    pub booking_revenue_cents: i64,
    pub service_fee_revenue_cents: i64,
    pub guest_fee_revenue_cents: i64,
    pub subscription_revenue_cents: i64,
    pub total_transactions: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct MonthlyRevenue {
    pub month: String,
    pub revenue_cents: i64,
}

/// Label/value pairs sized for chart rendering. Buckets with no activity
/// are present with value 0 so the series is always dense.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartSeries {
    pub labels: Vec<String>,
    pub data: Vec<i64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RevenueReport {
    pub generated_at: DateTime<Utc>,
    pub summary: RevenueSummary,
    pub transactions: Vec<RevenueTransaction>,
    pub monthly_breakdown: Vec<MonthlyRevenue>,
    /// Non-fatal degradations (a snapshot source that failed and was
    /// treated as empty). Empty on a clean run.
    pub warnings: Vec<String>,
}

/// Apply date-range and type constraints.
pub fn filter_transactions(
    transactions: &[RevenueTransaction],
    filter: &ReportFilter,
) -> Vec<RevenueTransaction> {
    transactions
        .iter()
        .filter(|tx| {
            let day = tx.date.date_naive();
            filter.start_date.is_none_or(|start| day >= start)
                && filter.end_date.is_none_or(|end| day <= end)
                && filter.tx_type.matches(tx.tx_type)
        })
        .cloned()
        .collect()
}

/// Deterministic ordering: date descending, then type name ascending. Two
/// runs over the same snapshot always render identically.
pub fn sort_transactions(transactions: &mut [RevenueTransaction]) {
    transactions.sort_by(|a, b| {
        b.date
            .cmp(&a.date)
            .then_with(|| a.tx_type.as_str().cmp(b.tx_type.as_str()))
    });
}

pub fn summarize(transactions: &[RevenueTransaction]) -> RevenueSummary {
    let mut summary = RevenueSummary {
        total_transactions: transactions.len() as i64,
        ..Default::default()
    };
    for tx in transactions {
        summary.total_revenue_cents += tx.amount_cents;
        match tx.tx_type {
            TransactionType::Booking => summary.booking_revenue_cents += tx.amount_cents,
            TransactionType::ServiceFee => summary.service_fee_revenue_cents += tx.amount_cents,
            TransactionType::GuestFee => summary.guest_fee_revenue_cents += tx.amount_cents,
            TransactionType::Subscription => {
                summary.subscription_revenue_cents += tx.amount_cents
            }
        }
    }
    summary
}

/// Dense 7-day revenue trend ending on `today`. Bucket keys compare at
/// month-day granularity, the same resolution the dashboard labels use.
pub fn daily_series(transactions: &[RevenueTransaction], today: NaiveDate) -> ChartSeries {
    let mut labels = Vec::with_capacity(DAILY_WINDOW_DAYS as usize);
    let mut data = Vec::with_capacity(DAILY_WINDOW_DAYS as usize);

    for offset in (0..DAILY_WINDOW_DAYS).rev() {
        let day = today - Days::new(offset);
        let key = day.format("%m-%d").to_string();
        let total: i64 = transactions
            .iter()
            .filter(|tx| tx.date.format("%m-%d").to_string() == key)
            .map(|tx| tx.amount_cents)
            .sum();
        labels.push(key);
        data.push(total);
    }

    ChartSeries { labels, data }
}

/// Dense 6-month series ending in the month of `today`, keyed by
/// `(year, month)`.
pub fn monthly_series(transactions: &[RevenueTransaction], today: NaiveDate) -> ChartSeries {
    let mut labels = Vec::with_capacity(MONTHLY_WINDOW_MONTHS as usize);
    let mut data = Vec::with_capacity(MONTHLY_WINDOW_MONTHS as usize);

    for offset in (0..MONTHLY_WINDOW_MONTHS).rev() {
        let month_start = today.with_day(1).unwrap_or(today) - Months::new(offset);
        let total: i64 = transactions
            .iter()
            .filter(|tx| {
                tx.date.year() == month_start.year() && tx.date.month() == month_start.month()
            })
            .map(|tx| tx.amount_cents)
            .sum();
        labels.push(month_start.format("%b %Y").to_string());
        data.push(total);
    }

    ChartSeries { labels, data }
}

/// Monthly breakdown rows for the report payload, derived from the same
/// buckets as the chart series.
pub fn monthly_breakdown(
    transactions: &[RevenueTransaction],
    today: NaiveDate,
) -> Vec<MonthlyRevenue> {
    let series = monthly_series(transactions, today);
    series
        .labels
        .into_iter()
        .zip(series.data)
        .map(|(month, revenue_cents)| MonthlyRevenue {
            month,
            revenue_cents,
        })
        .collect()
}

/// Render the transaction rows as CSV for export.
pub fn transactions_to_csv(transactions: &[RevenueTransaction]) -> String {
    let mut csv = String::from("Date,Type,Amount,Reference,Label\n");
    for tx in transactions {
        csv.push_str(&format!(
            "{},{},{:.2},{},{}\n",
            tx.date.format("%Y-%m-%d %H:%M:%S"),
            tx.tx_type.as_str(),
            tx.amount_cents as f64 / 100.0,
            tx.reference_id,
            escape_csv_field(&tx.label),
        ));
    }
    csv
}

/// Escape a field for CSV output, including formula injection prevention.
/// Spreadsheet applications will execute cells starting with =, +, -, @,
/// tab or carriage return; such values are prefixed with a single quote.
fn escape_csv_field(field: &str) -> String {
    let needs_quoting =
        field.contains(',') || field.contains('"') || field.contains('\n') || field.contains('\r');

    let is_formula = field
        .chars()
        .next()
        .map(|c| matches!(c, '=' | '+' | '-' | '@' | '\t' | '\r'))
        .unwrap_or(false);

    let escaped = if is_formula {
        format!("'{}", field)
    } else {
        field.to_string()
    };

    if needs_quoting || is_formula {
        format!("\"{}\"", escaped.replace('"', "\"\""))
    } else {
        escaped
    }
}
