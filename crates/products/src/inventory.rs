use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use farmgate_core::{FarmId, ProductId, Quantity};

/// Harvested stock of a product on a farm.
///
/// Incremented when a production cycle is harvested; one row per
/// (product, farm) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductInventory {
    pub product_id: ProductId,
    pub farm_id: FarmId,
    pub quantity: Quantity,
    pub updated_at: DateTime<Utc>,
}
