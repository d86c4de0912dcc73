pub mod policy;
pub mod promo;
pub mod revenue;
pub mod subscription;

use axum::Router;

use crate::adapters::http::app_state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(subscription::router())
        .merge(revenue::router())
        .nest("/admin", policy::router())
        .nest("/promos", promo::router())
}
