use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use farmgate_core::{DomainError, FarmId, Quantity, SupplyId};
use farmgate_supplies::{NewSupply, NewSupplyPurchase, Supply, SupplyPurchase, UsageHistoryEntry};

use crate::error::{StoreError, StoreResult};

/// Supplies: CRUD, low-stock queries, purchases (restock) and the
/// append-only usage history.
pub struct SupplyStore {
    pool: PgPool,
}

impl SupplyStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, input: NewSupply) -> StoreResult<Supply> {
        let supply = input.into_supply(SupplyId::new(), Utc::now());
        sqlx::query(
            "INSERT INTO supplies (id, name, unit, available, farm_id, supplier_id, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(supply.id.as_uuid())
        .bind(&supply.name)
        .bind(&supply.unit)
        .bind(supply.available.value())
        .bind(supply.farm_id.as_uuid())
        .bind(supply.supplier_id.as_uuid())
        .bind(supply.created_at)
        .execute(&self.pool)
        .await?;
        Ok(supply)
    }

    pub async fn get(&self, id: SupplyId) -> StoreResult<Supply> {
        let row = sqlx::query("SELECT * FROM supplies WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_one(&self.pool)
            .await
            .map_err(StoreError::from_fetch)?;
        decode_supply(&row)
    }

    pub async fn list(&self, farm_id: Option<FarmId>) -> StoreResult<Vec<Supply>> {
        let rows = match farm_id {
            Some(farm) => {
                sqlx::query("SELECT * FROM supplies WHERE farm_id = $1 ORDER BY name")
                    .bind(farm.as_uuid())
                    .fetch_all(&self.pool)
                    .await?
            }
            None => {
                sqlx::query("SELECT * FROM supplies ORDER BY name")
                    .fetch_all(&self.pool)
                    .await?
            }
        };
        rows.iter().map(decode_supply).collect()
    }

    /// Supplies whose available stock is strictly below `threshold`.
    pub async fn low_stock(&self, threshold: Quantity) -> StoreResult<Vec<Supply>> {
        let rows = sqlx::query("SELECT * FROM supplies WHERE available < $1 ORDER BY available")
            .bind(threshold.value())
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(decode_supply).collect()
    }

    pub async fn update(&self, id: SupplyId, input: NewSupply) -> StoreResult<Supply> {
        let updated = sqlx::query(
            "UPDATE supplies SET name = $2, unit = $3, available = $4, farm_id = $5, \
             supplier_id = $6 WHERE id = $1",
        )
        .bind(id.as_uuid())
        .bind(&input.name)
        .bind(&input.unit)
        .bind(input.available.value())
        .bind(input.farm_id.as_uuid())
        .bind(input.supplier_id.as_uuid())
        .execute(&self.pool)
        .await?;

        if updated.rows_affected() == 0 {
            return Err(StoreError::Domain(DomainError::NotFound));
        }
        self.get(id).await
    }

    pub async fn delete(&self, id: SupplyId) -> StoreResult<()> {
        let deleted = sqlx::query("DELETE FROM supplies WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await?;
        if deleted.rows_affected() == 0 {
            return Err(StoreError::Domain(DomainError::NotFound));
        }
        Ok(())
    }

    /// Record a purchase and restock the supply, atomically.
    pub async fn record_purchase(
        &self,
        input: NewSupplyPurchase,
    ) -> StoreResult<SupplyPurchase> {
        let purchase = SupplyPurchase {
            id: Uuid::now_v7(),
            supply_id: input.supply_id,
            supplier_id: input.supplier_id,
            quantity: input.quantity,
            unit_cost: input.unit_cost,
            purchased_on: input.purchased_on,
        };

        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query("UPDATE supplies SET available = available + $2 WHERE id = $1")
            .bind(purchase.supply_id.as_uuid())
            .bind(purchase.quantity.value())
            .execute(&mut *tx)
            .await?;
        if updated.rows_affected() == 0 {
            return Err(StoreError::Domain(DomainError::NotFound));
        }

        sqlx::query(
            "INSERT INTO supply_purchases (id, supply_id, supplier_id, quantity, unit_cost, purchased_on) \
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(purchase.id)
        .bind(purchase.supply_id.as_uuid())
        .bind(purchase.supplier_id.as_uuid())
        .bind(purchase.quantity.value())
        .bind(purchase.unit_cost.value())
        .bind(purchase.purchased_on)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        tracing::info!(supply_id = %purchase.supply_id, quantity = %purchase.quantity, "supply restocked");
        Ok(purchase)
    }

    pub async fn purchases(&self, supply_id: SupplyId) -> StoreResult<Vec<SupplyPurchase>> {
        let rows = sqlx::query(
            "SELECT * FROM supply_purchases WHERE supply_id = $1 ORDER BY purchased_on DESC",
        )
        .bind(supply_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| {
                Ok(SupplyPurchase {
                    id: row.try_get("id")?,
                    supply_id: SupplyId::from_uuid(row.try_get("supply_id")?),
                    supplier_id: row.try_get::<Uuid, _>("supplier_id")?.into(),
                    quantity: decode_quantity(row.try_get("quantity")?)?,
                    unit_cost: farmgate_core::Money::new(row.try_get("unit_cost")?)?,
                    purchased_on: row.try_get("purchased_on")?,
                })
            })
            .collect()
    }

    pub async fn history(&self, supply_id: SupplyId) -> StoreResult<Vec<UsageHistoryEntry>> {
        let rows = sqlx::query(
            "SELECT * FROM supply_usage_history WHERE supply_id = $1 ORDER BY used_at DESC",
        )
        .bind(supply_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| {
                Ok(UsageHistoryEntry {
                    id: row.try_get("id")?,
                    supply_id: SupplyId::from_uuid(row.try_get("supply_id")?),
                    quantity_used: decode_quantity(row.try_get("quantity_used")?)?,
                    used_at: row.try_get::<DateTime<Utc>, _>("used_at")?,
                })
            })
            .collect()
    }
}

pub(crate) fn decode_quantity(value: Decimal) -> Result<Quantity, StoreError> {
    Quantity::new(value).map_err(StoreError::Domain)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    // The CHECK constraint makes a negative column value unreachable through
    // this crate; decoding still refuses one from a hand-edited row.
    #[test]
    fn negative_column_value_fails_decoding() {
        assert!(decode_quantity(dec!(-0.5)).is_err());
        assert_eq!(decode_quantity(dec!(12.25)).unwrap().value(), dec!(12.25));
    }
}

pub(crate) fn decode_supply(row: &PgRow) -> StoreResult<Supply> {
    Ok(Supply {
        id: SupplyId::from_uuid(row.try_get("id")?),
        name: row.try_get("name")?,
        unit: row.try_get("unit")?,
        available: decode_quantity(row.try_get("available")?)?,
        farm_id: FarmId::from_uuid(row.try_get("farm_id")?),
        supplier_id: row.try_get::<Uuid, _>("supplier_id")?.into(),
        created_at: row.try_get("created_at")?,
    })
}
