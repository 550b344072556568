//! `farmgate-infra` — Postgres persistence for the domain crates.
//!
//! One store per domain area, all backed by a shared `PgPool`. Multi-step
//! stock mutations (usage reconciliation, harvest, sale registration) run
//! inside SQL transactions; consuming stock is a guarded decrement so two
//! concurrent requests cannot race a supply below zero.

pub mod db;
pub mod error;
pub mod stores;

pub use db::{connect, run_migrations};
pub use error::{StoreError, StoreResult};
