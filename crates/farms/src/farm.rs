use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use farmgate_core::{DomainError, DomainResult, FarmId, PartyId};

/// A farm: the owning unit for supplies, activities and production cycles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Farm {
    pub id: FarmId,
    pub name: String,
    pub location: String,
    /// Cultivated area in hectares, when known.
    pub hectares: Option<Decimal>,
    pub owner_id: PartyId,
    pub created_at: DateTime<Utc>,
}

/// Validated input for creating or replacing a farm.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewFarm {
    pub name: String,
    pub location: String,
    pub hectares: Option<Decimal>,
    pub owner_id: PartyId,
}

impl NewFarm {
    pub fn new(
        name: String,
        location: String,
        hectares: Option<Decimal>,
        owner_id: PartyId,
    ) -> DomainResult<Self> {
        if name.trim().is_empty() {
            return Err(DomainError::validation("farm name cannot be empty"));
        }
        if let Some(h) = hectares {
            if h.is_sign_negative() || h.is_zero() {
                return Err(DomainError::validation("hectares must be positive"));
            }
        }
        Ok(Self {
            name,
            location,
            hectares,
            owner_id,
        })
    }

    pub fn into_farm(self, id: FarmId, created_at: DateTime<Utc>) -> Farm {
        Farm {
            id,
            name: self.name,
            location: self.location,
            hectares: self.hectares,
            owner_id: self.owner_id,
            created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn rejects_blank_name() {
        assert!(NewFarm::new("  ".into(), "Cauca".into(), None, PartyId::new()).is_err());
    }

    #[test]
    fn rejects_nonpositive_hectares() {
        assert!(NewFarm::new("La Esperanza".into(), "Cauca".into(), Some(dec!(0)), PartyId::new())
            .is_err());
        assert!(
            NewFarm::new("La Esperanza".into(), "Cauca".into(), Some(dec!(2.5)), PartyId::new())
                .is_ok()
        );
    }
}
