use chrono::{NaiveDate, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Postgres, Row, Transaction};
use uuid::Uuid;

use farmgate_core::{DomainError, FarmId, ProductId, ProductionId, Quantity};
use farmgate_production::{NewProduction, ProductionCycle, ProductionStatus};
use farmgate_supplies::{consumption_plan, reconcile_usage, restock_plan, UsageLine};

use crate::error::{StoreError, StoreResult};
use crate::stores::product_store::add_harvest_to_inventory;
use crate::stores::stock;
use crate::stores::supply_store::decode_quantity;

/// Production cycles and their supply-usage lines.
///
/// Every operation that moves stock (create, update, harvest, delete) runs
/// inside one transaction so a failed consume leaves nothing half-applied.
pub struct ProductionStore {
    pool: PgPool,
}

impl ProductionStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, input: NewProduction) -> StoreResult<ProductionCycle> {
        let plan = consumption_plan(&input.usage_lines).map_err(StoreError::Domain)?;
        let cycle = input.into_cycle(ProductionId::new());
        let now = Utc::now();

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "INSERT INTO productions \
             (id, farm_id, product_id, sown_on, status, harvested_on, harvested_quantity) \
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(cycle.id.as_uuid())
        .bind(cycle.farm_id.as_uuid())
        .bind(cycle.product_id.as_uuid())
        .bind(cycle.sown_on)
        .bind(cycle.status.as_str())
        .bind(cycle.harvested_on)
        .bind(cycle.harvested_quantity.map(|q| q.value()))
        .execute(&mut *tx)
        .await?;

        insert_usage_lines(&mut tx, cycle.id, &cycle.usage_lines).await?;
        stock::apply_adjustments(&mut tx, &plan, now).await?;

        // Back-dated harvested registrations move yield into inventory
        // immediately.
        if let (ProductionStatus::Harvested, Some(qty)) = (cycle.status, cycle.harvested_quantity)
        {
            add_harvest_to_inventory(&mut tx, cycle.product_id, cycle.farm_id, qty, now).await?;
        }

        tx.commit().await?;
        tracing::info!(production_id = %cycle.id, "production cycle created");
        Ok(cycle)
    }

    pub async fn get(&self, id: ProductionId) -> StoreResult<ProductionCycle> {
        let row = sqlx::query("SELECT * FROM productions WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_one(&self.pool)
            .await
            .map_err(StoreError::from_fetch)?;
        let lines = self.usage_lines(id).await?;
        decode_cycle(&row, lines)
    }

    pub async fn list(&self, farm_id: Option<FarmId>) -> StoreResult<Vec<ProductionCycle>> {
        let rows = match farm_id {
            Some(farm) => {
                sqlx::query("SELECT * FROM productions WHERE farm_id = $1 ORDER BY sown_on DESC")
                    .bind(farm.as_uuid())
                    .fetch_all(&self.pool)
                    .await?
            }
            None => {
                sqlx::query("SELECT * FROM productions ORDER BY sown_on DESC")
                    .fetch_all(&self.pool)
                    .await?
            }
        };

        let mut cycles = Vec::with_capacity(rows.len());
        for row in &rows {
            let id = ProductionId::from_uuid(row.try_get("id")?);
            let lines = self.usage_lines(id).await?;
            cycles.push(decode_cycle(row, lines)?);
        }
        Ok(cycles)
    }

    /// Replace a cycle's fields and usage lines, reconciling stock by diff.
    pub async fn update(
        &self,
        id: ProductionId,
        input: NewProduction,
    ) -> StoreResult<ProductionCycle> {
        if input.status == ProductionStatus::Harvested {
            return Err(StoreError::Domain(DomainError::validation(
                "use the harvest operation to mark a cycle harvested",
            )));
        }

        let current = self.get(id).await?;
        current.ensure_editable().map_err(StoreError::Domain)?;

        let plan = reconcile_usage(&current.usage_lines, &input.usage_lines)
            .map_err(StoreError::Domain)?;
        let now = Utc::now();

        let mut tx = self.pool.begin().await?;

        // Status guard repeated in SQL: a cycle harvested since the read
        // above must not be edited.
        let updated = sqlx::query(
            "UPDATE productions SET farm_id = $2, product_id = $3, sown_on = $4, status = $5 \
             WHERE id = $1 AND status <> 'harvested'",
        )
        .bind(id.as_uuid())
        .bind(input.farm_id.as_uuid())
        .bind(input.product_id.as_uuid())
        .bind(input.sown_on)
        .bind(input.status.as_str())
        .execute(&mut *tx)
        .await?;
        if updated.rows_affected() == 0 {
            return Err(StoreError::Domain(DomainError::conflict(
                "production cycle is already harvested",
            )));
        }

        sqlx::query("DELETE FROM production_usage WHERE production_id = $1")
            .bind(id.as_uuid())
            .execute(&mut *tx)
            .await?;
        insert_usage_lines(&mut tx, id, &input.usage_lines).await?;

        stock::apply_adjustments(&mut tx, &plan, now).await?;

        tx.commit().await?;
        tracing::info!(production_id = %id, adjustments = plan.len(), "production cycle updated");
        self.get(id).await
    }

    /// Mark a cycle harvested and add its yield to product inventory.
    pub async fn harvest(
        &self,
        id: ProductionId,
        quantity: Quantity,
        harvested_on: NaiveDate,
    ) -> StoreResult<ProductionCycle> {
        let mut cycle = self.get(id).await?;
        cycle
            .harvest(quantity, harvested_on)
            .map_err(StoreError::Domain)?;

        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        // Status guard repeated in SQL: a concurrent harvest loses here.
        let updated = sqlx::query(
            "UPDATE productions SET status = 'harvested', harvested_on = $2, \
             harvested_quantity = $3 WHERE id = $1 AND status <> 'harvested'",
        )
        .bind(id.as_uuid())
        .bind(harvested_on)
        .bind(quantity.value())
        .execute(&mut *tx)
        .await?;
        if updated.rows_affected() == 0 {
            return Err(StoreError::Domain(DomainError::conflict(
                "production cycle is already harvested",
            )));
        }

        add_harvest_to_inventory(&mut tx, cycle.product_id, cycle.farm_id, quantity, now).await?;

        tx.commit().await?;
        tracing::info!(production_id = %id, %quantity, "production cycle harvested");
        Ok(cycle)
    }

    pub async fn set_status(
        &self,
        id: ProductionId,
        status: ProductionStatus,
    ) -> StoreResult<ProductionCycle> {
        let mut cycle = self.get(id).await?;
        cycle.set_status(status).map_err(StoreError::Domain)?;

        let updated = sqlx::query(
            "UPDATE productions SET status = $2 WHERE id = $1 AND status <> 'harvested'",
        )
        .bind(id.as_uuid())
        .bind(status.as_str())
        .execute(&self.pool)
        .await?;
        if updated.rows_affected() == 0 {
            return Err(StoreError::Domain(DomainError::conflict(
                "production cycle is already harvested",
            )));
        }
        Ok(cycle)
    }

    /// Delete a non-harvested cycle, returning all consumed supplies to
    /// stock in the same transaction.
    pub async fn delete(&self, id: ProductionId) -> StoreResult<()> {
        let cycle = self.get(id).await?;
        cycle.ensure_editable().map_err(StoreError::Domain)?;

        let plan = restock_plan(&cycle.usage_lines);
        let now = Utc::now();

        let mut tx = self.pool.begin().await?;
        stock::apply_adjustments(&mut tx, &plan, now).await?;
        sqlx::query("DELETE FROM productions WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        tracing::info!(production_id = %id, restocked_lines = plan.len(), "production cycle deleted");
        Ok(())
    }

    async fn usage_lines(&self, id: ProductionId) -> StoreResult<Vec<UsageLine>> {
        let rows = sqlx::query(
            "SELECT supply_id, quantity, used_on FROM production_usage WHERE production_id = $1",
        )
        .bind(id.as_uuid())
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(decode_usage_line).collect()
    }
}

pub(crate) fn decode_usage_line(row: &PgRow) -> StoreResult<UsageLine> {
    let line = UsageLine::new(
        row.try_get::<Uuid, _>("supply_id")?.into(),
        decode_quantity(row.try_get("quantity")?)?,
        row.try_get("used_on")?,
    )?;
    Ok(line)
}

async fn insert_usage_lines(
    tx: &mut Transaction<'_, Postgres>,
    id: ProductionId,
    lines: &[UsageLine],
) -> StoreResult<()> {
    for line in lines {
        sqlx::query(
            "INSERT INTO production_usage (production_id, supply_id, quantity, used_on) \
             VALUES ($1, $2, $3, $4)",
        )
        .bind(id.as_uuid())
        .bind(line.supply_id.as_uuid())
        .bind(line.quantity.value())
        .bind(line.used_on)
        .execute(&mut **tx)
        .await?;
    }
    Ok(())
}

fn decode_cycle(row: &PgRow, usage_lines: Vec<UsageLine>) -> StoreResult<ProductionCycle> {
    let status: String = row.try_get("status")?;
    let harvested_quantity = row
        .try_get::<Option<rust_decimal::Decimal>, _>("harvested_quantity")?
        .map(Quantity::new)
        .transpose()?;

    Ok(ProductionCycle {
        id: ProductionId::from_uuid(row.try_get("id")?),
        farm_id: FarmId::from_uuid(row.try_get("farm_id")?),
        product_id: ProductId::from_uuid(row.try_get("product_id")?),
        sown_on: row.try_get("sown_on")?,
        status: ProductionStatus::parse(&status)?,
        harvested_on: row.try_get("harvested_on")?,
        harvested_quantity,
        usage_lines,
    })
}
