use std::net::SocketAddr;

use axum::http::HeaderValue;
use env_helpers::{get_env, get_env_default};

pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub cors_origin: HeaderValue,
    pub database_url: String,
    /// Monthly price of the premium plan. Activation refuses to run with a
    /// non-positive price rather than granting premium for free.
    pub premium_price_cents: i64,
    /// Provider-side reference of the premium plan; approval callbacks must
    /// carry this value.
    pub premium_plan_ref: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let bind_addr: SocketAddr = get_env_default("BIND_ADDR", "127.0.0.1:3001".parse().unwrap());
        let cors_origin: HeaderValue =
            get_env_default("CORS_ORIGIN", String::from("http://localhost:3000"))
                .parse()
                .expect("CORS_ORIGIN must be a valid header value");
        let database_url: String = get_env("DATABASE_URL");
        let premium_price_cents: i64 = get_env_default("PREMIUM_PLAN_PRICE_CENTS", 2900);
        let premium_plan_ref: String = get_env_default(
            "PREMIUM_PLAN_REF",
            "stayward-premium-monthly".to_string(),
        );

        Self {
            bind_addr,
            cors_origin,
            database_url,
            premium_price_cents,
            premium_plan_ref,
        }
    }
}
