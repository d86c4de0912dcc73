use std::sync::Arc;

use crate::{
    application::use_cases::{
        policy::PolicyUseCases, promo::PromoUseCases, revenue::RevenueUseCases,
        subscription::SubscriptionUseCases,
    },
    infra::config::AppConfig,
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub subscription_use_cases: Arc<SubscriptionUseCases>,
    pub revenue_use_cases: Arc<RevenueUseCases>,
    pub policy_use_cases: Arc<PolicyUseCases>,
    pub promo_use_cases: Arc<PromoUseCases>,
}
