use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use farmgate_core::{DomainResult, Money, PartyId, Quantity, SupplyId};

/// A recorded purchase of a supply. Recording one restocks the supply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplyPurchase {
    pub id: Uuid,
    pub supply_id: SupplyId,
    pub supplier_id: PartyId,
    pub quantity: Quantity,
    pub unit_cost: Money,
    pub purchased_on: NaiveDate,
}

/// Validated input for recording a purchase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSupplyPurchase {
    pub supply_id: SupplyId,
    pub supplier_id: PartyId,
    pub quantity: Quantity,
    pub unit_cost: Money,
    pub purchased_on: NaiveDate,
}

impl NewSupplyPurchase {
    pub fn new(
        supply_id: SupplyId,
        supplier_id: PartyId,
        quantity: Quantity,
        unit_cost: Money,
        purchased_on: NaiveDate,
    ) -> DomainResult<Self> {
        // Quantity::positive has already rejected zero at parse time; keep the
        // constructor as the single entry point anyway.
        Ok(Self {
            supply_id,
            supplier_id,
            quantity,
            unit_cost,
            purchased_on,
        })
    }

    pub fn total_cost(&self) -> Money {
        self.unit_cost.times(self.quantity)
    }
}
