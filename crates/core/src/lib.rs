//! `farmgate-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod error;
pub mod id;
pub mod money;
pub mod quantity;

pub use error::{DomainError, DomainResult};
pub use id::{
    ActivityId, FarmId, PartyId, ProductId, ProductionId, SaleId, SupplyId, UserId,
};
pub use money::Money;
pub use quantity::Quantity;
