//! `farmgate-api` — HTTP surface (Axum) over the farmgate stores.

pub mod app;
pub mod context;
pub mod middleware;
