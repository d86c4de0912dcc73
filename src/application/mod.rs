pub mod app_error;
pub mod fees;
pub mod ports;
pub mod revenue;
pub mod use_cases;
