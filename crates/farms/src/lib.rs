//! `farmgate-farms` — farm records.

pub mod farm;

pub use farm::{Farm, NewFarm};
