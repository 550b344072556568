use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use farmgate_core::{DomainError, DomainResult, FarmId, PartyId, Quantity, SupplyId};

/// A depletable farm input: fertilizer, feed, seed, ...
///
/// Invariant: `available` never goes negative. Mutations run through guarded
/// SQL updates in infra; this type only carries the validated state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Supply {
    pub id: SupplyId,
    pub name: String,
    /// Unit the stock is measured in (kg, l, bulto, ...).
    pub unit: String,
    pub available: Quantity,
    pub farm_id: FarmId,
    pub supplier_id: PartyId,
    pub created_at: DateTime<Utc>,
}

/// Validated input for creating or replacing a supply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSupply {
    pub name: String,
    pub unit: String,
    pub available: Quantity,
    pub farm_id: FarmId,
    pub supplier_id: PartyId,
}

impl NewSupply {
    pub fn new(
        name: String,
        unit: String,
        available: Quantity,
        farm_id: FarmId,
        supplier_id: PartyId,
    ) -> DomainResult<Self> {
        if name.trim().is_empty() {
            return Err(DomainError::validation("supply name cannot be empty"));
        }
        if unit.trim().is_empty() {
            return Err(DomainError::validation("unit of measure cannot be empty"));
        }
        Ok(Self {
            name,
            unit,
            available,
            farm_id,
            supplier_id,
        })
    }

    pub fn into_supply(self, id: SupplyId, created_at: DateTime<Utc>) -> Supply {
        Supply {
            id,
            name: self.name,
            unit: self.unit,
            available: self.available,
            farm_id: self.farm_id,
            supplier_id: self.supplier_id,
            created_at,
        }
    }
}

/// Append-only log row written whenever stock is consumed.
///
/// Independent of the editable usage lines on activities/productions: history
/// rows are never updated or deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageHistoryEntry {
    pub id: Uuid,
    pub supply_id: SupplyId,
    pub quantity_used: Quantity,
    pub used_at: DateTime<Utc>,
}
