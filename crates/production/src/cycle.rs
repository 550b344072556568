use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use farmgate_core::{DomainError, DomainResult, FarmId, ProductId, ProductionId, Quantity};
use farmgate_supplies::UsageLine;

/// Lifecycle of a production cycle.
///
/// Harvested is terminal: harvested cycles can no longer be edited or
/// deleted, and harvesting moves the yield into product inventory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductionStatus {
    Sown,
    Growing,
    Harvested,
}

impl ProductionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductionStatus::Sown => "sown",
            ProductionStatus::Growing => "growing",
            ProductionStatus::Harvested => "harvested",
        }
    }

    pub fn parse(s: &str) -> DomainResult<Self> {
        match s {
            "sown" => Ok(ProductionStatus::Sown),
            "growing" => Ok(ProductionStatus::Growing),
            "harvested" => Ok(ProductionStatus::Harvested),
            other => Err(DomainError::validation(format!(
                "unknown production status '{other}'"
            ))),
        }
    }
}

/// One planting-to-harvest cycle of a product on a farm.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductionCycle {
    pub id: ProductionId,
    pub farm_id: FarmId,
    pub product_id: ProductId,
    pub sown_on: NaiveDate,
    pub status: ProductionStatus,
    pub harvested_on: Option<NaiveDate>,
    pub harvested_quantity: Option<Quantity>,
    pub usage_lines: Vec<UsageLine>,
}

impl ProductionCycle {
    /// Guard shared by update/delete paths: harvested cycles are immutable.
    pub fn ensure_editable(&self) -> DomainResult<()> {
        if self.status == ProductionStatus::Harvested {
            return Err(DomainError::conflict(
                "production cycle is already harvested",
            ));
        }
        Ok(())
    }

    /// Transition into `Harvested`, recording yield and date.
    pub fn harvest(&mut self, quantity: Quantity, harvested_on: NaiveDate) -> DomainResult<()> {
        self.ensure_editable()?;
        if quantity.is_zero() {
            return Err(DomainError::validation(
                "harvested quantity must be greater than zero",
            ));
        }
        self.status = ProductionStatus::Harvested;
        self.harvested_quantity = Some(quantity);
        self.harvested_on = Some(harvested_on);
        Ok(())
    }

    /// Change the lifecycle status without harvesting.
    pub fn set_status(&mut self, status: ProductionStatus) -> DomainResult<()> {
        self.ensure_editable()?;
        if status == ProductionStatus::Harvested {
            return Err(DomainError::validation(
                "use the harvest operation to mark a cycle harvested",
            ));
        }
        self.status = status;
        Ok(())
    }
}

/// Validated input for creating a production cycle.
///
/// The original system allowed registering a cycle that was already
/// harvested (back-dated records); that is kept: a harvested creation must
/// carry yield and date, a non-harvested one must not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProduction {
    pub farm_id: FarmId,
    pub product_id: ProductId,
    pub sown_on: NaiveDate,
    pub status: ProductionStatus,
    pub harvested_on: Option<NaiveDate>,
    pub harvested_quantity: Option<Quantity>,
    pub usage_lines: Vec<UsageLine>,
}

impl NewProduction {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        farm_id: FarmId,
        product_id: ProductId,
        sown_on: NaiveDate,
        status: ProductionStatus,
        harvested_on: Option<NaiveDate>,
        harvested_quantity: Option<Quantity>,
        usage_lines: Vec<UsageLine>,
    ) -> DomainResult<Self> {
        match status {
            ProductionStatus::Harvested => {
                let qty = harvested_quantity.ok_or_else(|| {
                    DomainError::validation("harvested cycle requires a harvested quantity")
                })?;
                if qty.is_zero() {
                    return Err(DomainError::validation(
                        "harvested quantity must be greater than zero",
                    ));
                }
                if harvested_on.is_none() {
                    return Err(DomainError::validation(
                        "harvested cycle requires a harvest date",
                    ));
                }
            }
            _ => {
                if harvested_on.is_some() || harvested_quantity.is_some() {
                    return Err(DomainError::validation(
                        "harvest fields are only valid for harvested cycles",
                    ));
                }
            }
        }
        Ok(Self {
            farm_id,
            product_id,
            sown_on,
            status,
            harvested_on,
            harvested_quantity,
            usage_lines,
        })
    }

    pub fn into_cycle(self, id: ProductionId) -> ProductionCycle {
        ProductionCycle {
            id,
            farm_id: self.farm_id,
            product_id: self.product_id,
            sown_on: self.sown_on,
            status: self.status,
            harvested_on: self.harvested_on,
            harvested_quantity: self.harvested_quantity,
            usage_lines: self.usage_lines,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 4, d).unwrap()
    }

    fn sown_cycle() -> ProductionCycle {
        NewProduction::new(
            FarmId::new(),
            ProductId::new(),
            date(1),
            ProductionStatus::Sown,
            None,
            None,
            Vec::new(),
        )
        .unwrap()
        .into_cycle(ProductionId::new())
    }

    #[test]
    fn harvest_records_yield_and_is_terminal() {
        let mut cycle = sown_cycle();
        cycle
            .harvest(Quantity::new(dec!(120.5)).unwrap(), date(20))
            .unwrap();
        assert_eq!(cycle.status, ProductionStatus::Harvested);
        assert_eq!(cycle.harvested_quantity.unwrap().value(), dec!(120.5));

        // Second harvest and any further edits are conflicts.
        assert!(cycle
            .harvest(Quantity::new(dec!(1)).unwrap(), date(21))
            .is_err());
        assert!(cycle.set_status(ProductionStatus::Growing).is_err());
        assert!(cycle.ensure_editable().is_err());
    }

    #[test]
    fn status_change_cannot_sneak_into_harvested() {
        let mut cycle = sown_cycle();
        assert!(cycle.set_status(ProductionStatus::Harvested).is_err());
        cycle.set_status(ProductionStatus::Growing).unwrap();
        assert_eq!(cycle.status, ProductionStatus::Growing);
    }

    #[test]
    fn harvested_creation_requires_yield_fields() {
        let missing = NewProduction::new(
            FarmId::new(),
            ProductId::new(),
            date(1),
            ProductionStatus::Harvested,
            None,
            None,
            Vec::new(),
        );
        assert!(missing.is_err());

        let ok = NewProduction::new(
            FarmId::new(),
            ProductId::new(),
            date(1),
            ProductionStatus::Harvested,
            Some(date(20)),
            Some(Quantity::new(dec!(80)).unwrap()),
            Vec::new(),
        );
        assert!(ok.is_ok());
    }

    #[test]
    fn sown_creation_rejects_stray_harvest_fields() {
        let stray = NewProduction::new(
            FarmId::new(),
            ProductId::new(),
            date(1),
            ProductionStatus::Sown,
            Some(date(20)),
            None,
            Vec::new(),
        );
        assert!(stray.is_err());
    }
}
