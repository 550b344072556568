use chrono::Utc;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use farmgate_core::{DomainError, FarmId};
use farmgate_farms::{Farm, NewFarm};

use crate::error::{StoreError, StoreResult};

/// Farm CRUD.
pub struct FarmStore {
    pool: PgPool,
}

impl FarmStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, input: NewFarm) -> StoreResult<Farm> {
        let farm = input.into_farm(FarmId::new(), Utc::now());
        sqlx::query(
            "INSERT INTO farms (id, name, location, hectares, owner_id, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(farm.id.as_uuid())
        .bind(&farm.name)
        .bind(&farm.location)
        .bind(farm.hectares)
        .bind(farm.owner_id.as_uuid())
        .bind(farm.created_at)
        .execute(&self.pool)
        .await?;
        Ok(farm)
    }

    pub async fn get(&self, id: FarmId) -> StoreResult<Farm> {
        let row = sqlx::query("SELECT * FROM farms WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_one(&self.pool)
            .await
            .map_err(StoreError::from_fetch)?;
        decode_farm(&row)
    }

    pub async fn list(&self) -> StoreResult<Vec<Farm>> {
        let rows = sqlx::query("SELECT * FROM farms ORDER BY name")
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(decode_farm).collect()
    }

    pub async fn update(&self, id: FarmId, input: NewFarm) -> StoreResult<Farm> {
        let updated = sqlx::query(
            "UPDATE farms SET name = $2, location = $3, hectares = $4, owner_id = $5 \
             WHERE id = $1",
        )
        .bind(id.as_uuid())
        .bind(&input.name)
        .bind(&input.location)
        .bind(input.hectares)
        .bind(input.owner_id.as_uuid())
        .execute(&self.pool)
        .await?;

        if updated.rows_affected() == 0 {
            return Err(StoreError::Domain(DomainError::NotFound));
        }
        self.get(id).await
    }

    pub async fn delete(&self, id: FarmId) -> StoreResult<()> {
        let deleted = sqlx::query("DELETE FROM farms WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await?;
        if deleted.rows_affected() == 0 {
            return Err(StoreError::Domain(DomainError::NotFound));
        }
        Ok(())
    }
}

fn decode_farm(row: &PgRow) -> StoreResult<Farm> {
    Ok(Farm {
        id: FarmId::from_uuid(row.try_get("id")?),
        name: row.try_get("name")?,
        location: row.try_get("location")?,
        hectares: row.try_get("hectares")?,
        owner_id: row.try_get::<Uuid, _>("owner_id")?.into(),
        created_at: row.try_get("created_at")?,
    })
}
