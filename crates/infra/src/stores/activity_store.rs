use chrono::Utc;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Postgres, Row, Transaction};

use farmgate_core::{ActivityId, DomainError, FarmId};
use farmgate_production::{Activity, NewActivity};
use farmgate_supplies::{consumption_plan, reconcile_usage, restock_plan, UsageLine};

use crate::error::{StoreError, StoreResult};
use crate::stores::production_store::decode_usage_line;
use crate::stores::stock;

/// Farm activities and their supply-usage lines.
///
/// Same transactional stock discipline as production cycles.
pub struct ActivityStore {
    pool: PgPool,
}

impl ActivityStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, input: NewActivity) -> StoreResult<Activity> {
        let plan = consumption_plan(&input.usage_lines).map_err(StoreError::Domain)?;
        let activity = input.into_activity(ActivityId::new());
        let now = Utc::now();

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "INSERT INTO activities (id, farm_id, kind, description, starts_on, ends_on) \
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(activity.id.as_uuid())
        .bind(activity.farm_id.as_uuid())
        .bind(&activity.kind)
        .bind(&activity.description)
        .bind(activity.starts_on)
        .bind(activity.ends_on)
        .execute(&mut *tx)
        .await?;

        insert_usage_lines(&mut tx, activity.id, &activity.usage_lines).await?;
        stock::apply_adjustments(&mut tx, &plan, now).await?;

        tx.commit().await?;
        tracing::info!(activity_id = %activity.id, "activity created");
        Ok(activity)
    }

    pub async fn get(&self, id: ActivityId) -> StoreResult<Activity> {
        let row = sqlx::query("SELECT * FROM activities WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_one(&self.pool)
            .await
            .map_err(StoreError::from_fetch)?;
        let lines = self.usage_lines(id).await?;
        decode_activity(&row, lines)
    }

    pub async fn list(&self, farm_id: Option<FarmId>) -> StoreResult<Vec<Activity>> {
        let rows = match farm_id {
            Some(farm) => {
                sqlx::query("SELECT * FROM activities WHERE farm_id = $1 ORDER BY starts_on DESC")
                    .bind(farm.as_uuid())
                    .fetch_all(&self.pool)
                    .await?
            }
            None => {
                sqlx::query("SELECT * FROM activities ORDER BY starts_on DESC")
                    .fetch_all(&self.pool)
                    .await?
            }
        };

        let mut activities = Vec::with_capacity(rows.len());
        for row in &rows {
            let id = ActivityId::from_uuid(row.try_get("id")?);
            let lines = self.usage_lines(id).await?;
            activities.push(decode_activity(row, lines)?);
        }
        Ok(activities)
    }

    /// Replace an activity's fields and usage lines, reconciling stock by
    /// diff.
    pub async fn update(&self, id: ActivityId, input: NewActivity) -> StoreResult<Activity> {
        let current = self.get(id).await?;

        let plan = reconcile_usage(&current.usage_lines, &input.usage_lines)
            .map_err(StoreError::Domain)?;
        let now = Utc::now();

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "UPDATE activities SET farm_id = $2, kind = $3, description = $4, starts_on = $5, \
             ends_on = $6 WHERE id = $1",
        )
        .bind(id.as_uuid())
        .bind(input.farm_id.as_uuid())
        .bind(&input.kind)
        .bind(&input.description)
        .bind(input.starts_on)
        .bind(input.ends_on)
        .execute(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM activity_usage WHERE activity_id = $1")
            .bind(id.as_uuid())
            .execute(&mut *tx)
            .await?;
        insert_usage_lines(&mut tx, id, &input.usage_lines).await?;

        stock::apply_adjustments(&mut tx, &plan, now).await?;

        tx.commit().await?;
        tracing::info!(activity_id = %id, adjustments = plan.len(), "activity updated");
        self.get(id).await
    }

    /// Delete an activity, returning all consumed supplies to stock in the
    /// same transaction.
    pub async fn delete(&self, id: ActivityId) -> StoreResult<()> {
        let activity = self.get(id).await?;
        let plan = restock_plan(&activity.usage_lines);
        let now = Utc::now();

        let mut tx = self.pool.begin().await?;
        stock::apply_adjustments(&mut tx, &plan, now).await?;
        let deleted = sqlx::query("DELETE FROM activities WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&mut *tx)
            .await?;
        if deleted.rows_affected() == 0 {
            return Err(StoreError::Domain(DomainError::NotFound));
        }
        tx.commit().await?;

        tracing::info!(activity_id = %id, restocked_lines = plan.len(), "activity deleted");
        Ok(())
    }

    async fn usage_lines(&self, id: ActivityId) -> StoreResult<Vec<UsageLine>> {
        let rows = sqlx::query(
            "SELECT supply_id, quantity, used_on FROM activity_usage WHERE activity_id = $1",
        )
        .bind(id.as_uuid())
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(decode_usage_line).collect()
    }
}

async fn insert_usage_lines(
    tx: &mut Transaction<'_, Postgres>,
    id: ActivityId,
    lines: &[UsageLine],
) -> StoreResult<()> {
    for line in lines {
        sqlx::query(
            "INSERT INTO activity_usage (activity_id, supply_id, quantity, used_on) \
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

fn decode_activity(row: &PgRow, usage_lines: Vec<UsageLine>) -> StoreResult<Activity> {
    Ok(Activity {
        id: ActivityId::from_uuid(row.try_get("id")?),
        farm_id: FarmId::from_uuid(row.try_get("farm_id")?),
        kind: row.try_get("kind")?,
        description: row.try_get("description")?,
        starts_on: row.try_get("starts_on")?,
        ends_on: row.try_get("ends_on")?,
        usage_lines,
    })
}
