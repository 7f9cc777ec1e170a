//! HTTP handlers for the campus service.

pub mod health;
pub mod info;
pub mod metrics;
pub mod operations;
