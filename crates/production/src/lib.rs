//! `farmgate-production` — production cycles (sowing → harvest) and farm
//! activities. Both may consume supplies through editable usage lines.

pub mod activity;
pub mod cycle;

pub use activity::{Activity, NewActivity};
pub use cycle::{NewProduction, ProductionCycle, ProductionStatus};
