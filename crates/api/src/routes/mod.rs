//! HTTP route handlers.

pub mod health;
pub mod messages;
pub mod metrics;
pub mod sales;
