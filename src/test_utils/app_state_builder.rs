//! Test app state builder for HTTP-level testing: wires the use cases to
//! in-memory mocks so routes can be exercised with `axum_test::TestServer`.

use std::sync::Arc;

use crate::{
    adapters::http::app_state::AppState,
    application::use_cases::{
        policy::PolicyUseCases, promo::PromoUseCases, revenue::RevenueUseCases,
        subscription::SubscriptionUseCases,
    },
    domain::entities::{booking::Booking, promo::PromoCode, subscription::Subscription},
    infra::config::AppConfig,
    test_utils::{
        InMemoryBookingRepo, InMemoryPolicyRepo, InMemoryPromoRepo,
        InMemorySubscriptionEventRepo, InMemorySubscriptionRepo,
    },
};

fn test_config() -> AppConfig {
    AppConfig {
        bind_addr: "127.0.0.1:0".parse().unwrap(),
        cors_origin: "http://localhost:3000".parse().unwrap(),
        database_url: "postgres://unused".to_string(),
        premium_price_cents: 2900,
        premium_plan_ref: "stayward-premium-monthly".to_string(),
    }
}

#[derive(Default)]
pub struct TestAppStateBuilder {
    bookings: Vec<Booking>,
    subscriptions: Vec<Subscription>,
    promos: Vec<PromoCode>,
}

impl TestAppStateBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_booking(mut self, booking: Booking) -> Self {
        self.bookings.push(booking);
        self
    }

    pub fn with_subscription(mut self, subscription: Subscription) -> Self {
        self.subscriptions.push(subscription);
        self
    }

    pub fn with_promo(mut self, promo: PromoCode) -> Self {
        self.promos.push(promo);
        self
    }

    pub fn build(self) -> AppState {
        let subscription_repo = Arc::new(InMemorySubscriptionRepo::new());
        for sub in self.subscriptions {
            subscription_repo.seed(sub);
        }
        let booking_repo = Arc::new(InMemoryBookingRepo::new());
        for booking in self.bookings {
            booking_repo.seed(booking);
        }
        let promo_repo = Arc::new(InMemoryPromoRepo::new());
        for promo in self.promos {
            promo_repo.seed(promo);
        }
        let event_repo = Arc::new(InMemorySubscriptionEventRepo::new());
        let policy_repo = Arc::new(InMemoryPolicyRepo::new());

        let config = test_config();

        let subscription_use_cases = SubscriptionUseCases::new(
            subscription_repo.clone(),
            event_repo,
            config.premium_price_cents,
            config.premium_plan_ref.clone(),
        );
        let revenue_use_cases = RevenueUseCases::new(
            booking_repo,
            subscription_repo,
            policy_repo.clone(),
        );
        let policy_use_cases = PolicyUseCases::new(policy_repo);
        let promo_use_cases = PromoUseCases::new(promo_repo);

        AppState {
            config: Arc::new(config),
            subscription_use_cases: Arc::new(subscription_use_cases),
            revenue_use_cases: Arc::new(revenue_use_cases),
            policy_use_cases: Arc::new(policy_use_cases),
            promo_use_cases: Arc::new(promo_use_cases),
        }
    }
}
