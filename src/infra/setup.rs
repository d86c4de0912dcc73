use std::fs::File;
use std::sync::Arc;

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::{
    adapters::http::app_state::AppState,
    application::use_cases::{
        policy::{PolicyRepo, PolicyUseCases},
        promo::{PromoRepo, PromoUseCases},
        revenue::{BookingRepo, RevenueUseCases},
        subscription::{SubscriptionEventRepo, SubscriptionRepo, SubscriptionUseCases},
    },
    infra::{config::AppConfig, postgres_persistence},
};

pub async fn init_app_state() -> anyhow::Result<AppState> {
    let config = AppConfig::from_env();

    let postgres_arc = Arc::new(postgres_persistence(&config.database_url).await?);

    let subscription_repo_arc = postgres_arc.clone() as Arc<dyn SubscriptionRepo>;
    let event_repo_arc = postgres_arc.clone() as Arc<dyn SubscriptionEventRepo>;
    let booking_repo_arc = postgres_arc.clone() as Arc<dyn BookingRepo>;
    let policy_repo_arc = postgres_arc.clone() as Arc<dyn PolicyRepo>;
    let promo_repo_arc = postgres_arc.clone() as Arc<dyn PromoRepo>;

    let subscription_use_cases = SubscriptionUseCases::new(
        subscription_repo_arc.clone(),
        event_repo_arc,
        config.premium_price_cents,
        config.premium_plan_ref.clone(),
    );

    let revenue_use_cases = RevenueUseCases::new(
        booking_repo_arc,
        subscription_repo_arc,
        policy_repo_arc.clone(),
    );

    let policy_use_cases = PolicyUseCases::new(policy_repo_arc);
    let promo_use_cases = PromoUseCases::new(promo_repo_arc);

    Ok(AppState {
        config: Arc::new(config),
        subscription_use_cases: Arc::new(subscription_use_cases),
        revenue_use_cases: Arc::new(revenue_use_cases),
        policy_use_cases: Arc::new(policy_use_cases),
        promo_use_cases: Arc::new(promo_use_cases),
    })
}

pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "stayward_billing=debug,tower_http=debug".into());

    // Console (pretty logs)
    let console_layer = fmt::layer()
        .with_target(false)
        .with_level(true)
        .pretty();

    // File (structured JSON logs)
    let file = File::create("app.log").expect("cannot create log file");
    let json_layer = fmt::layer()
        .json()
        .with_writer(file)
        .with_current_span(true)
        .with_span_list(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(json_layer)
        .try_init()
        .ok();
}
