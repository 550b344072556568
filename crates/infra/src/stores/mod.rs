//! One store per domain area, all backed by the shared `PgPool`.

pub mod activity_store;
pub mod farm_store;
pub mod party_store;
pub mod product_store;
pub mod production_store;
pub mod sale_store;
pub mod stock;
pub mod supply_store;
pub mod user_store;

pub use activity_store::ActivityStore;
pub use farm_store::FarmStore;
pub use party_store::PartyStore;
pub use product_store::ProductStore;
pub use production_store::ProductionStore;
pub use sale_store::SaleStore;
pub use supply_store::SupplyStore;
pub use user_store::{UserRecord, UserStore};
