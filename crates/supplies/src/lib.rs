//! `farmgate-supplies` — depletable farm inputs (insumos).
//!
//! Holds the one piece of the system with formal invariants: stock
//! consumption and diff-based reconciliation when usage lines are edited.
//! The functions here compute *plans* of stock adjustments; applying a plan
//! atomically against the database is the infra crate's job.

pub mod purchase;
pub mod supply;
pub mod usage;

pub use purchase::{NewSupplyPurchase, SupplyPurchase};
pub use supply::{NewSupply, Supply, UsageHistoryEntry};
pub use usage::{consumption_plan, reconcile_usage, restock_plan, StockAdjustment, UsageLine};
