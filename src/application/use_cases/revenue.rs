use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    app_error::AppResult,
    application::revenue::{
        builder::build_transactions,
        report::{
            ChartSeries, ReportFilter, RevenueReport, daily_series, filter_transactions,
            monthly_breakdown, monthly_series, sort_transactions, summarize, transactions_to_csv,
        },
    },
    application::use_cases::{policy::PolicyRepo, subscription::SubscriptionRepo},
    domain::entities::{booking::Booking, policy::Policy, subscription::Subscription},
};

#[async_trait]
pub trait BookingRepo: Send + Sync {
    /// All bookings for a host's properties. Read-only: bookings are owned
    /// by the booking subsystem.
    async fn list_by_host(&self, host_id: Uuid) -> AppResult<Vec<Booking>>;
}

/// Both chart series, ready for rendering.
#[derive(Debug, Clone, serde::Serialize)]
pub struct RevenueCharts {
    pub daily: ChartSeries,
    pub monthly: ChartSeries,
}

/// Point-in-time snapshot of every input the revenue engines need. Each
/// source degrades to empty independently; `warnings` records what failed.
struct Snapshot {
    bookings: Vec<Booking>,
    subscriptions: Vec<Subscription>,
    policy: Policy,
    warnings: Vec<String>,
}

#[derive(Clone)]
pub struct RevenueUseCases {
    booking_repo: Arc<dyn BookingRepo>,
    subscription_repo: Arc<dyn SubscriptionRepo>,
    policy_repo: Arc<dyn PolicyRepo>,
}

impl RevenueUseCases {
    pub fn new(
        booking_repo: Arc<dyn BookingRepo>,
        subscription_repo: Arc<dyn SubscriptionRepo>,
        policy_repo: Arc<dyn PolicyRepo>,
    ) -> Self {
        Self {
            booking_repo,
            subscription_repo,
            policy_repo,
        }
    }

    /// Issue the three bulk reads concurrently. A failed source is treated
    /// as empty (policy falls back to its defaults) so a report request
    /// degrades instead of erroring.
    async fn snapshot(&self, host_id: Uuid) -> Snapshot {
        let (bookings, subscriptions, policy) = tokio::join!(
            self.booking_repo.list_by_host(host_id),
            self.subscription_repo.list_by_host(host_id),
            self.policy_repo.get(),
        );

        let mut warnings = Vec::new();

        let bookings = bookings.unwrap_or_else(|err| {
            tracing::warn!(host_id = %host_id, error = ?err, "Booking read failed; reporting without bookings");
            warnings.push("Booking records were unavailable and are excluded".to_string());
            Vec::new()
        });
        let subscriptions = subscriptions.unwrap_or_else(|err| {
            tracing::warn!(host_id = %host_id, error = ?err, "Subscription read failed; reporting without subscriptions");
            warnings.push("Subscription records were unavailable and are excluded".to_string());
            Vec::new()
        });
        let policy = match policy {
            Ok(Some(policy)) => policy,
            Ok(None) => Policy::default(),
            Err(err) => {
                tracing::warn!(host_id = %host_id, error = ?err, "Policy read failed; using defaults");
                warnings.push("Platform policy was unavailable; defaults applied".to_string());
                Policy::default()
            }
        };

        Snapshot {
            bookings,
            subscriptions,
            policy,
            warnings,
        }
    }

    /// Rebuild the transaction set for a host under the given filter. The
    /// booking-status constraint narrows which bookings feed the builder;
    /// eligibility rules still apply on top of it.
    async fn filtered_transactions(
        &self,
        host_id: Uuid,
        filter: &ReportFilter,
    ) -> AppResult<(Vec<crate::domain::entities::revenue::RevenueTransaction>, Vec<String>)> {
        filter.validate()?;
        let snapshot = self.snapshot(host_id).await;

        let bookings: Vec<Booking> = match filter.booking_status {
            Some(status) => snapshot
                .bookings
                .into_iter()
                .filter(|b| b.status == status)
                .collect(),
            None => snapshot.bookings,
        };

        let transactions =
            build_transactions(&snapshot.policy, &bookings, &snapshot.subscriptions);
        let mut transactions = filter_transactions(&transactions, filter);
        sort_transactions(&mut transactions);
        Ok((transactions, snapshot.warnings))
    }

    /// The full report payload: summary totals, ordered transaction rows
    /// and the monthly breakdown. Zero underlying data produces a
    /// well-formed all-zero payload, never an error.
    pub async fn generate_report(
        &self,
        host_id: Uuid,
        filter: ReportFilter,
    ) -> AppResult<RevenueReport> {
        let (transactions, warnings) = self.filtered_transactions(host_id, &filter).await?;
        let generated_at = Utc::now();
        let summary = summarize(&transactions);
        let monthly = monthly_breakdown(&transactions, generated_at.date_naive());

        Ok(RevenueReport {
            generated_at,
            summary,
            transactions,
            monthly_breakdown: monthly,
            warnings,
        })
    }

    /// Dense 7-day and 6-month chart series over the unfiltered set.
    pub async fn chart_series(&self, host_id: Uuid) -> AppResult<RevenueCharts> {
        let (transactions, _) = self
            .filtered_transactions(host_id, &ReportFilter::default())
            .await?;
        let today = Utc::now().date_naive();
        Ok(RevenueCharts {
            daily: daily_series(&transactions, today),
            monthly: monthly_series(&transactions, today),
        })
    }

    /// CSV export of the filtered transaction rows.
    pub async fn export_csv(&self, host_id: Uuid, filter: ReportFilter) -> AppResult<String> {
        let (transactions, _) = self.filtered_transactions(host_id, &filter).await?;
        Ok(transactions_to_csv(&transactions))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        app_error::AppError,
        domain::entities::{
            booking::BookingStatus,
            revenue::TransactionType,
        },
        test_utils::{
            FailingBookingRepo, InMemoryBookingRepo, InMemoryPolicyRepo,
            InMemorySubscriptionRepo, create_test_booking, create_test_subscription,
        },
    };
    use chrono::NaiveDate;

    fn use_cases(
        bookings: Arc<InMemoryBookingRepo>,
        subs: Arc<InMemorySubscriptionRepo>,
    ) -> RevenueUseCases {
        RevenueUseCases::new(bookings, subs, Arc::new(InMemoryPolicyRepo::new()))
    }

    #[tokio::test]
    async fn test_report_for_single_confirmed_booking() {
        let host = Uuid::new_v4();
        let bookings = Arc::new(InMemoryBookingRepo::new());
        bookings.seed(create_test_booking(host, |b| {
            b.number_of_guests = 3;
            b.pricing.total_cents = 5000;
        }));
        let uc = use_cases(bookings, Arc::new(InMemorySubscriptionRepo::new()));

        let report = uc.generate_report(host, ReportFilter::default()).await.unwrap();
        assert_eq!(report.summary.total_transactions, 3);
        assert_eq!(report.summary.booking_revenue_cents, 5000);
        assert_eq!(report.summary.service_fee_revenue_cents, 800);
        assert_eq!(report.summary.guest_fee_revenue_cents, 300);
        assert_eq!(report.summary.total_revenue_cents, 6100);
        assert!(report.warnings.is_empty());
        assert_eq!(report.monthly_breakdown.len(), 6);
    }

    #[tokio::test]
    async fn test_report_additivity_with_subscriptions() {
        let host = Uuid::new_v4();
        let bookings = Arc::new(InMemoryBookingRepo::new());
        bookings.seed(create_test_booking(host, |_| {}));
        bookings.seed(create_test_booking(host, |b| {
            b.status = BookingStatus::Completed;
        }));
        let subs = Arc::new(InMemorySubscriptionRepo::new());
        subs.seed(create_test_subscription(host, |_| {}));
        let uc = use_cases(bookings, subs);

        let report = uc.generate_report(host, ReportFilter::default()).await.unwrap();
        let s = &report.summary;
        assert_eq!(
            s.total_revenue_cents,
            s.booking_revenue_cents
                + s.service_fee_revenue_cents
                + s.guest_fee_revenue_cents
                + s.subscription_revenue_cents
        );
        assert_eq!(s.total_transactions, 7);
        assert_eq!(s.subscription_revenue_cents, 2900);
    }

    #[tokio::test]
    async fn test_empty_data_yields_well_formed_zero_report() {
        let uc = use_cases(
            Arc::new(InMemoryBookingRepo::new()),
            Arc::new(InMemorySubscriptionRepo::new()),
        );
        let report = uc
            .generate_report(Uuid::new_v4(), ReportFilter::default())
            .await
            .unwrap();
        assert_eq!(report.summary.total_revenue_cents, 0);
        assert_eq!(report.summary.total_transactions, 0);
        assert!(report.transactions.is_empty());
        assert_eq!(report.monthly_breakdown.len(), 6);
        assert!(report.monthly_breakdown.iter().all(|m| m.revenue_cents == 0));
    }

    #[tokio::test]
    async fn test_failed_booking_read_degrades_with_warning() {
        let host = Uuid::new_v4();
        let subs = Arc::new(InMemorySubscriptionRepo::new());
        subs.seed(create_test_subscription(host, |_| {}));
        let uc = RevenueUseCases::new(
            Arc::new(FailingBookingRepo),
            subs,
            Arc::new(InMemoryPolicyRepo::new()),
        );

        let report = uc.generate_report(host, ReportFilter::default()).await.unwrap();
        // Subscriptions still reported; bookings degraded to empty.
        assert_eq!(report.summary.booking_revenue_cents, 0);
        assert_eq!(report.summary.subscription_revenue_cents, 2900);
        assert_eq!(report.warnings.len(), 1);
        assert!(report.warnings[0].contains("Booking records"));
    }

    #[tokio::test]
    async fn test_booking_status_filter() {
        let host = Uuid::new_v4();
        let bookings = Arc::new(InMemoryBookingRepo::new());
        bookings.seed(create_test_booking(host, |b| b.status = BookingStatus::Confirmed));
        bookings.seed(create_test_booking(host, |b| b.status = BookingStatus::Completed));
        let uc = use_cases(bookings, Arc::new(InMemorySubscriptionRepo::new()));

        let filter = ReportFilter {
            booking_status: Some(BookingStatus::Completed),
            ..Default::default()
        };
        let report = uc.generate_report(host, filter).await.unwrap();
        assert_eq!(report.summary.total_transactions, 3);

        // Filtering to a non-eligible status reports nothing.
        let filter = ReportFilter {
            booking_status: Some(BookingStatus::Pending),
            ..Default::default()
        };
        let report = uc.generate_report(host, filter).await.unwrap();
        assert_eq!(report.summary.total_transactions, 0);
    }

    #[tokio::test]
    async fn test_invalid_date_range_is_rejected() {
        let uc = use_cases(
            Arc::new(InMemoryBookingRepo::new()),
            Arc::new(InMemorySubscriptionRepo::new()),
        );
        let filter = ReportFilter {
            start_date: NaiveDate::from_ymd_opt(2024, 6, 2),
            end_date: NaiveDate::from_ymd_opt(2024, 6, 1),
            ..Default::default()
        };
        let err = uc.generate_report(Uuid::new_v4(), filter).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_chart_series_are_dense() {
        let host = Uuid::new_v4();
        let bookings = Arc::new(InMemoryBookingRepo::new());
        bookings.seed(create_test_booking(host, |b| {
            b.created_at = Utc::now();
        }));
        let uc = use_cases(bookings, Arc::new(InMemorySubscriptionRepo::new()));

        let charts = uc.chart_series(host).await.unwrap();
        assert_eq!(charts.daily.labels.len(), 7);
        assert_eq!(charts.daily.data.len(), 7);
        assert_eq!(charts.monthly.labels.len(), 6);
        // The booking landed today: the last daily bucket carries it.
        assert!(*charts.daily.data.last().unwrap() > 0);
    }

    #[tokio::test]
    async fn test_csv_export_contains_rows() {
        let host = Uuid::new_v4();
        let bookings = Arc::new(InMemoryBookingRepo::new());
        bookings.seed(create_test_booking(host, |b| {
            b.pricing.total_cents = 5000;
        }));
        let uc = use_cases(bookings, Arc::new(InMemorySubscriptionRepo::new()));

        let csv = uc.export_csv(host, ReportFilter::default()).await.unwrap();
        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some("Date,Type,Amount,Reference,Label"));
        assert_eq!(lines.count(), 3);
        assert!(csv.contains("Booking"));
        assert!(csv.contains("50.00"));
    }

    #[tokio::test]
    async fn test_type_filter_narrows_report() {
        let host = Uuid::new_v4();
        let bookings = Arc::new(InMemoryBookingRepo::new());
        bookings.seed(create_test_booking(host, |_| {}));
        let uc = use_cases(bookings, Arc::new(InMemorySubscriptionRepo::new()));

        let filter = ReportFilter {
            tx_type: crate::application::revenue::report::TypeFilter::Only(
                TransactionType::ServiceFee,
            ),
            ..Default::default()
        };
        let report = uc.generate_report(host, filter).await.unwrap();
        assert_eq!(report.summary.total_transactions, 1);
        assert_eq!(report.summary.service_fee_revenue_cents, 800);
        assert_eq!(report.summary.total_revenue_cents, 800);
    }
}
